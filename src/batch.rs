//! Conversion of many grounder outputs in one run.
//!
//! Each instance is converted on a blocking worker thread. A failing or timed-out instance is
//! logged and recorded in the [`BatchReport`]; it never stops the rest of the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ConvertConfig;
use crate::error::{Error, Result};
use crate::output;

/// Outcome of a batch run. Paths are the input files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub timed_out: Vec<PathBuf>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len() + self.timed_out.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.timed_out.is_empty()
    }
}

/// The files in `dir` with the given extension, sorted by path.
pub fn collect_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Where the document for `input` is written: `<out_dir>/<input stem>.json`.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "domain".to_string());
    out_dir.join(format!("{}.json", stem))
}

/// Read, convert and serialize one instance.
fn convert_to_json(input: &Path, config: &ConvertConfig) -> Result<String> {
    let text = std::fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
    let domain = crate::convert(&text, config)?;
    output::to_json_string(&domain, config.keep_conditional)
}

/// Convert every input into `out_dir`, at most `config.jobs` at a time.
///
/// A document is only written once its conversion finished within `config.timeout`.
pub async fn run_batch(
    inputs: Vec<PathBuf>,
    out_dir: &Path,
    config: &ConvertConfig,
) -> Result<BatchReport> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| Error::io(out_dir, e))?;

    let total = inputs.len();
    info!("Converting {} instances with {} workers", total, config.jobs);

    let worker_config = config.clone();
    let report = run_workers(inputs, out_dir, config.jobs, config.timeout, move |input| {
        convert_to_json(input, &worker_config)
    })
    .await;

    info!(
        "Batch finished: {} converted, {} failed, {} timed out (of {})",
        report.converted.len(),
        report.failed.len(),
        report.timed_out.len(),
        total
    );
    Ok(report)
}

/// Run `work` for every input on blocking threads and write what it returns.
///
/// A worker holds its permit until `work` returns, even after its timeout fired, so no more
/// than `jobs` conversions ever run at once.
async fn run_workers<F>(
    inputs: Vec<PathBuf>,
    out_dir: &Path,
    jobs: usize,
    timeout: Duration,
    work: F,
) -> BatchReport
where
    F: Fn(&Path) -> Result<String> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();
    for input in inputs {
        let semaphore = semaphore.clone();
        let work = work.clone();
        tasks.spawn(async move {
            let permit = semaphore.acquire_owned().await;
            let worker_input = input.clone();
            let outcome = tokio::time::timeout(
                timeout,
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    work(&worker_input)
                }),
            )
            .await;
            (input, outcome)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = tasks.join_next().await {
        let (input, outcome) = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!("Batch task aborted: {}", e);
                continue;
            }
        };

        match outcome {
            Err(_) => {
                warn!("Timed out converting {}", input.display());
                report.timed_out.push(input);
            }
            Ok(Err(e)) => {
                warn!("Conversion of {} panicked: {}", input.display(), e);
                report.failed.push((input, e.to_string()));
            }
            Ok(Ok(Err(e))) => {
                warn!("Failed to convert {}: {}", input.display(), e);
                report.failed.push((input, e.to_string()));
            }
            Ok(Ok(Ok(json))) => {
                let path = output_path(&input, out_dir);
                match tokio::fs::write(&path, json).await {
                    Ok(()) => {
                        debug!("Wrote {}", path.display());
                        report.converted.push(input);
                    }
                    Err(e) => {
                        let error = Error::io(&path, e);
                        warn!("Failed to write {}: {}", path.display(), error);
                        report.failed.push((input, error.to_string()));
                    }
                }
            }
        }
    }

    report.converted.sort();
    report.failed.sort();
    report.timed_out.sort();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_timed_out_workers_keep_their_permit() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..4)
            .map(|i| dir.path().join(format!("p{}.ground", i)))
            .collect();

        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (worker_running, worker_peak, worker_finished) =
            (running.clone(), peak.clone(), finished.clone());

        let report = run_workers(
            inputs,
            dir.path(),
            1,
            Duration::from_millis(1),
            move |_| {
                let now = worker_running.fetch_add(1, Ordering::SeqCst) + 1;
                worker_peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                worker_running.fetch_sub(1, Ordering::SeqCst);
                worker_finished.fetch_add(1, Ordering::SeqCst);
                Ok("{}".to_string())
            },
        )
        .await;

        assert_eq!(report.timed_out.len(), 4);
        assert!(report.converted.is_empty());

        for _ in 0..100 {
            if finished.load(Ordering::SeqCst) == 4 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(finished.load(Ordering::SeqCst), 4);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert!(!dir.path().join("p0.json").exists());
    }

    #[tokio::test]
    async fn test_workers_respect_the_job_limit() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..6)
            .map(|i| dir.path().join(format!("p{}.ground", i)))
            .collect();

        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (worker_running, worker_peak) = (running.clone(), peak.clone());

        let report = run_workers(inputs, dir.path(), 2, Duration::from_secs(10), move |_| {
            let now = worker_running.fetch_add(1, Ordering::SeqCst) + 1;
            worker_peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            worker_running.fetch_sub(1, Ordering::SeqCst);
            Ok("{}".to_string())
        })
        .await;

        assert_eq!(report.converted.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(dir.path().join("p5.json").is_file());
    }
}
