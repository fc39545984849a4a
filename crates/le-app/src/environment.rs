//! Simulator working directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::context::RunContext;
use crate::error::{AppError, AppResult};

/// Create the directory tree the simulator expects and copy its runtime
/// files into the processing path.
///
/// Refuses a processing path that already holds an `ecotalk/` tree, so two
/// pipelines never share one working directory.
pub fn prepare_runtime_environment(ctx: &RunContext, runtime_files: &[PathBuf]) -> AppResult<()> {
    let ecotalk = ctx.ecotalk_dir();
    if ecotalk.exists() {
        return Err(AppError::ProcessingPathInUse {
            path: ctx.processing_path.clone(),
        });
    }

    for dir in [ecotalk, ctx.parameters_dir(), ctx.reach_list_dir(), ctx.data_dir()] {
        fs::create_dir_all(&dir)?;
    }

    for file in runtime_files {
        copy_runtime_file(file, &ctx.processing_path)?;
    }

    info!(
        path = %ctx.processing_path.display(),
        files = runtime_files.len(),
        "prepared runtime environment"
    );
    Ok(())
}

fn copy_runtime_file(source: &Path, processing_path: &Path) -> AppResult<()> {
    let name = source
        .file_name()
        .ok_or_else(|| AppError::InvalidInput(format!("runtime file {} has no file name", source.display())))?;
    let target = processing_path.join(name);
    fs::copy(source, &target).map_err(|e| AppError::FileRead {
        path: source.to_path_buf(),
        source: e,
    })?;
    debug!(from = %source.display(), to = %target.display(), "copied runtime file");
    Ok(())
}
