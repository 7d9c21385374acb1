pub(crate) mod filters;
pub(crate) mod templates;
pub(crate) mod themes;
