use super::ConfirmationRecord;

/// Told that a dispatch was held back pending confirmation.
pub trait ConfirmationRequiredNotifier<C, R>: Send + Sync {
    fn confirmation_required(
        &self,
        sender: &C,
        record: &ConfirmationRecord<C, R>,
    ) -> anyhow::Result<()>;
}

impl<C, R, F> ConfirmationRequiredNotifier<C, R> for F
where
    F: Fn(&C, &ConfirmationRecord<C, R>) -> anyhow::Result<()> + Send + Sync,
{
    fn confirmation_required(
        &self,
        sender: &C,
        record: &ConfirmationRecord<C, R>,
    ) -> anyhow::Result<()> {
        self(sender, record)
    }
}

/// Told that a confirm attempt found nothing to confirm, either because no
/// record was pending or because it had expired.
pub trait NoPendingNotifier<C>: Send + Sync {
    fn no_pending(&self, sender: &C) -> anyhow::Result<()>;
}

impl<C, F> NoPendingNotifier<C> for F
where
    F: Fn(&C) -> anyhow::Result<()> + Send + Sync,
{
    fn no_pending(&self, sender: &C) -> anyhow::Result<()> {
        self(sender)
    }
}
