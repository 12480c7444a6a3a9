use std::sync::OnceLock;

use nix::sys::signal::{self, SigHandler, Signal};

use crate::cleaner::CancellationToken;

static CANCEL: OnceLock<CancellationToken> = OnceLock::new();

/// Install SIGINT/SIGTERM handlers that cancel the returned token.
///
/// The token is process-wide: repeated calls return clones of the same one.
pub fn install_cancel_handler() -> nix::Result<CancellationToken> {
    let token = CANCEL.get_or_init(CancellationToken::new).clone();

    unsafe {
        signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_cancel))?;
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_cancel))?;
    }

    Ok(token)
}

extern "C" fn handle_cancel(_: i32) {
    if let Some(token) = CANCEL.get() {
        token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_returns_shared_token() {
        let first = install_cancel_handler().unwrap();
        let second = install_cancel_handler().unwrap();

        first.cancel();
        assert!(second.is_cancelled());
    }

    #[test]
    fn test_sigint_cancels_token() {
        let token = install_cancel_handler().unwrap();

        signal::raise(Signal::SIGINT).unwrap();

        assert!(token.is_cancelled());
    }
}
