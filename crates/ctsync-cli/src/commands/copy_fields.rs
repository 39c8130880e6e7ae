use ctsync::Error;
use ctsync::merge::OverwriteApprover;
use ctsync::sync::CopyFieldsOptions;
use dialoguer::console::Term;
use tracing::warn;

use super::common::{Session, SyncOptions, finish};
use crate::interactive::InteractivePrompter;

pub struct CopyFields;

impl CopyFields {
    pub async fn execute(
        fields: &[String],
        source: &str,
        targets: &[String],
        publish: bool,
        force: bool,
        options: &SyncOptions<'_>,
    ) -> anyhow::Result<()> {
        let session = Session::open(options)?;
        let source = session.selector(source)?;
        let targets = session.selectors(targets)?;

        let force = force || session.config.non_interactive;
        let copy = CopyFieldsOptions {
            source,
            targets,
            fields: fields.to_vec(),
            publish,
            force,
        };

        let engine = session.engine()?;

        // Prompt only when someone can answer
        let mut prompter = (!force && Term::stderr().is_term()).then(InteractivePrompter::new);
        if !force && prompter.is_none() {
            warn!("Not running in a terminal; existing fields will not be overwritten (use --force)");
        }

        let approver = prompter
            .as_mut()
            .map(|prompter| prompter as &mut dyn OverwriteApprover);

        match engine.copy_fields(&copy, approver).await {
            Ok(report) => finish(&report),
            Err(Error::Aborted) => {
                eprintln!("\nCopy cancelled by user, nothing was changed.");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
