use ctsync::sync::DeleteFieldsOptions;

use super::common::{Session, SyncOptions, finish};

pub struct DeleteFields;

impl DeleteFields {
    pub async fn execute(
        fields: &[String],
        targets: &[String],
        force: bool,
        options: &SyncOptions<'_>,
    ) -> anyhow::Result<()> {
        let session = Session::open(options)?;
        let delete = DeleteFieldsOptions {
            targets: session.selectors(targets)?,
            fields: fields.to_vec(),
            force,
        };

        let report = session.engine()?.delete_fields(&delete).await?;
        finish(&report)
    }
}
