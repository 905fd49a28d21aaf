use async_trait::async_trait;
use erased_serde::Serializer;

#[async_trait]
pub trait Run {
    async fn run(&self, out: &mut (dyn Serializer + Send)) -> anyhow::Result<()>;
}

/// Implements [`Run`] for an enum whose variants all wrap something that
/// itself implements [`Run`].
#[macro_export]
macro_rules! dispatch_run {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        #[async_trait::async_trait]
        impl $crate::common::Run for $ty {
            async fn run(
                &self,
                out: &mut (dyn erased_serde::Serializer + Send),
            ) -> anyhow::Result<()> {
                match self {
                    $(Self::$variant(inner) => inner.run(out).await),+
                }
            }
        }
    };
}
