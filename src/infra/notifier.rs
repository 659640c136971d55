use std::io::Write;

use crate::{domain::events::NotificationEvent, infra::contracts::Notifier};

/// Rings the terminal bell for new-message notifications.
///
/// The BEL byte is safe to emit while the alternate screen is active; the
/// message body itself is surfaced through the status bar.
#[derive(Debug, Clone, Default)]
pub struct TerminalBellNotifier;

impl Notifier for TerminalBellNotifier {
    fn notify(&self, _event: &NotificationEvent) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}
