use crate::{
    api_client::InvitationApi,
    config::BatchConfig,
    invitation::{BatchSummary, Outcome},
};
use std::{fmt, io::Write};

/// Drives a batch, reporting one progress line per attempt to `progress`.
#[derive(Debug)]
pub struct Runner<C, W> {
    client: C,
    progress: W,
    quiet: bool,
}

impl<C: InvitationApi, W: Write> Runner<C, W> {
    pub fn new(client: C, progress: W, quiet: bool) -> Self {
        Self {
            client,
            progress,
            quiet,
        }
    }

    /// Issues `config.count` invitations one after another.
    ///
    /// Failures are recorded and the loop moves on, unless `stop_on_error`
    /// is set, in which case nothing after the first failure is attempted.
    pub fn run(&mut self, config: &BatchConfig) -> BatchSummary {
        let count = config.count;
        let mut results = Vec::new();
        let mut errors = Vec::new();

        self.report(format_args!("Creating {count} invitation(s)..."));

        for index in 1..=count {
            match self.client.create_invitation(&config.request) {
                Ok(data) => {
                    self.report(format_args!("✓ Created invitation {index}/{count}"));
                    results.push(Outcome::succeeded(index, data));
                }
                Err(e) => {
                    self.report(format_args!(
                        "✗ Failed to create invitation {index}/{count}: {e}"
                    ));
                    errors.push(Outcome::failed(index, e.to_string()));

                    if config.stop_on_error {
                        log::info!("Stopping after failed invitation {index}/{count}");
                        break;
                    }
                }
            }
        }

        BatchSummary::new(count, results, errors)
    }

    fn report(&mut self, line: fmt::Arguments) {
        if self.quiet {
            return;
        }
        if let Err(e) = writeln!(self.progress, "{line}") {
            log::debug!("Could not write progress: {e}");
        }
    }
}
