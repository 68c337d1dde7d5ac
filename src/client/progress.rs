//! Progress bar styling
// (c) 2026 The sftp-put authors

use std::path::Path;

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressFinish, ProgressStyle};

pub(crate) const MAX_UPDATE_FPS: u8 = 20;

const PROGRESS_STYLE_COMPACT: &str =
    "{msg:.dim} {wide_bar:.cyan} {eta} @ {decimal_bytes_per_sec} [{percent}%/{decimal_total_bytes:.dim}]";

// 11111111111111111111111111111111111111111111111111111111111111111111111111111111
// filename [==========================            ] 2m30s @ 123.4MB/s [70%/1.24GB]
// extremely-long-filename-no-really-very-long [== ] 2m30s @ 123.4MB/s [70%/1.24GB]
// 11111111111111111111111111111111111111111111111111111111111111111111111111111111

// About 35 characters of data readout, plus 20 for a useful bar.
const DATA_AND_PROGRESS: usize = 55;

// 11111111111111111111111111111111111111111111111111111111111111111111111111111111
// extremely-long-filename-no-really-very-long                         [70%/1.24GB]
// [==========================                                  ] 2m30s @ 123.4MB/s
// 11111111111111111111111111111111111111111111111111111111111111111111111111111111

const PROGRESS_STYLE_OVERLONG: &str =
    "{wide_msg:.dim} [{percent}%/{decimal_total_bytes:.dim}]\n{wide_bar:.cyan} {eta} @ {decimal_bytes_per_sec}";

fn use_long_style(terminal: &Term, msg_size: usize) -> bool {
    let term_width = terminal.size().1 as usize; // this returns a reasonable default if it can't detect
    msg_size + DATA_AND_PROGRESS > term_width
}

pub(crate) fn progress_style_for(terminal: &Term, msg_size: usize) -> &'static str {
    if use_long_style(terminal, msg_size) {
        PROGRESS_STYLE_OVERLONG
    } else {
        PROGRESS_STYLE_COMPACT
    }
}

/// A byte-counting progress bar for one file, added to `display`.
///
/// If the display is hidden, so is the bar.
pub(crate) fn progress_bar_for(display: &MultiProgress, local: &Path, size: u64) -> ProgressBar {
    if display.is_hidden() {
        return ProgressBar::hidden();
    }
    let filename = local
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let style = ProgressStyle::with_template(progress_style_for(&Term::stderr(), filename.len()))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    display.add(
        ProgressBar::new(size)
            .with_style(style)
            .with_message(filename)
            .with_finish(ProgressFinish::AndClear),
    )
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use console::Term;
    use indicatif::{MultiProgress, ProgressDrawTarget, ProgressStyle};

    use super::{
        progress_bar_for, progress_style_for, PROGRESS_STYLE_COMPACT, PROGRESS_STYLE_OVERLONG,
    };

    #[test]
    fn templates_parse() {
        for t in [PROGRESS_STYLE_COMPACT, PROGRESS_STYLE_OVERLONG] {
            assert!(ProgressStyle::with_template(t).is_ok(), "{t}");
        }
    }

    #[test]
    fn long_names_get_long_style() {
        assert_eq!(
            progress_style_for(&Term::stderr(), 10_000),
            PROGRESS_STYLE_OVERLONG
        );
    }

    #[test]
    fn hidden_display_hidden_bar() {
        let display = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = progress_bar_for(&display, Path::new("/tmp/file.txt"), 1234);
        assert!(bar.is_hidden());
    }
}
