pub(crate) mod border;
pub(crate) mod compositor;
pub(crate) mod filters;
pub(crate) mod raster;
pub(crate) mod text;
