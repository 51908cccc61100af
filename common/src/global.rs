use crate::context::Context;

pub trait GlobalCtx {
	fn ctx(&self) -> &Context;
}

/// Lets code generic over the global state pull out just the config section
/// it needs: `global.config::<ApiConfig>()`.
pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}
