//! sftp-put client event loop
// (c) 2026 The sftp-put authors

use std::path::Path;
use std::time::Instant;

use anyhow::{Context as _, Result};
use human_repr::{HumanDuration as _, HumanThroughput as _};
use indicatif::{MultiProgress, ProgressBar};
use tracing::{debug, info, trace_span};

use crate::config::Config;
use crate::session::{SftpSession, TransferSession};
use crate::upload::{UploadStats, Uploader};

/// Connects, uploads, disconnects.
// Caution: while the MultiProgress is live, console output must go through it (tracing does).
pub(crate) fn client_main(config: &Config, display: &MultiProgress, statistics: bool) -> Result<()> {
    let _guard = trace_span!("CLIENT").entered();
    info!("Source: {}", config.source.display());
    info!("Destination: {}", config.destination);

    let spinner = if display.is_hidden() {
        ProgressBar::hidden()
    } else {
        display.add(ProgressBar::new_spinner())
    };
    spinner.enable_steady_tick(std::time::Duration::from_millis(150));
    spinner.set_message(format!(
        "Connecting to {}:{} as {}",
        config.host, config.port, config.username
    ));
    info!("Connecting to {} as {}", config.host, config.username);
    let connected = SftpSession::connect(config);
    spinner.finish_and_clear();
    let mut session = connected.with_context(|| format!("connecting to {}", config.host))?;

    let result = transfer(
        &mut session,
        &config.source,
        &config.destination,
        display,
        statistics,
    );
    session.close();
    result.map(|_| ())
}

/// Runs the upload over an open session and reports on it.
///
/// Once the upload has succeeded, nothing else can make this fail.
fn transfer<S: TransferSession + ?Sized>(
    session: &mut S,
    source: &Path,
    destination: &str,
    display: &MultiProgress,
    statistics: bool,
) -> Result<UploadStats> {
    let start = Instant::now();
    let stats = Uploader::new(session)
        .with_display(display)
        .run(source, destination)?;
    let elapsed = start.elapsed();

    info!("Transfer complete.");
    if statistics {
        let rate = if elapsed.is_zero() {
            "unknown".to_string()
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = stats.bytes as f64 / elapsed.as_secs_f64();
            rate.human_throughput_bytes().to_string()
        };
        info!(
            "Uploaded {stats} in {}; average {rate}",
            elapsed.human_duration()
        );
    }
    if let Err(e) = display.clear() {
        debug!("could not clear progress display: {e}");
    }
    Ok(stats)
}

#[cfg(test)]
mod test {
    use indicatif::{MultiProgress, ProgressDrawTarget};

    use super::transfer;
    use crate::session::testing::RecordingSession;
    use crate::upload::UploadError;
    use crate::util::make_test_tempfile;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn success_reports_stats() {
        let (path, _dir) = make_test_tempfile("hello", "file.txt");
        let mut session = RecordingSession::new().with_directory("/srv");
        for statistics in [false, true] {
            let stats = transfer(&mut session, &path, "/srv/", &hidden(), statistics).unwrap();
            assert_eq!(stats.files, 1);
            assert_eq!(stats.bytes, 5);
        }
    }

    #[test]
    fn upload_failure_propagates() {
        let (path, _dir) = make_test_tempfile("hello", "file.txt");
        let mut session = RecordingSession::new();
        let err = transfer(&mut session, &path, "/missing/file.txt", &hidden(), true).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<UploadError>(),
                Some(UploadError::RemoteParentMissing { .. })
            ),
            "{err:?}"
        );
    }
}
