use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::analysis::{DocumentPages, PipelineOutput, Query, Segmenter, run_pipeline};
use crate::cli::{AnalyzeArgs, ExtractorMode};
use crate::model::{
    AnalysisReport, ExtractedSection, PagesManifest, RunMetadata, SourceDocument,
};
use crate::util::{sha256_file, utc_compact_string, utc_rfc3339_string, write_json_pretty};

mod extract;
mod input;
mod normalize;
mod output;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

use extract::*;
use input::*;
use normalize::*;
use output::*;
