/// Generator-level tunables. Empty today — there is nothing to configure
/// in the jumping-code lowering itself — but kept as a named type so a
/// future option doesn't become a breaking change to `IrGenerator::new`'s
/// signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrGenConfig;
