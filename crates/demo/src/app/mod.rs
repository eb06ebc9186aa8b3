pub(crate) mod bootstrap;
pub(crate) mod session;
