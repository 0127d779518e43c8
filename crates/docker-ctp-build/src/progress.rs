use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 外部コマンド実行中のスピナー
///
/// 表示のみで、実行結果には影響しない。端末でない場合 indicatif が描画を省略する。
pub struct CommandProgress {
    progress_bar: ProgressBar,
}

impl CommandProgress {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let style =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}");
        if let Ok(style) = style {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { progress_bar: pb }
    }

    pub fn finish_success(&self, message: &str) {
        self.progress_bar.finish_with_message(format!("{} ✓", message));
    }

    pub fn finish_error(&self, message: &str) {
        self.progress_bar.abandon_with_message(format!("{} ✗", message));
    }
}

impl Drop for CommandProgress {
    fn drop(&mut self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}
