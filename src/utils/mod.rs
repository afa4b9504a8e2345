pub(crate) mod json_path;
pub(crate) mod mask;

pub(crate) use json_path::{get_path, value_as_f64};
pub(crate) use mask::mask_key;
