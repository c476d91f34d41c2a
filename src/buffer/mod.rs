pub(crate) mod aligned;
pub(crate) mod pixel;
pub(crate) mod placement;
