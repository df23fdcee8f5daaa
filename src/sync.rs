pub(crate) mod apply;
pub(crate) mod pipeline;
pub(crate) mod task;
