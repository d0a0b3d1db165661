//! Terminal rendition of a redirect.

use tracing::debug;

use courseware_core::Navigator;
use courseware_core::traits::LOGIN_ROUTE;

use crate::output;

/// There are no pages to move between in a terminal: a redirect to the
/// login route becomes a notice, anything else is only logged.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, route: &str) {
        if route == LOGIN_ROUTE {
            output::notice("You are signed out. Run 'courseware login' to sign in again.");
        } else {
            debug!(route, "Ignoring navigation request");
        }
    }
}
