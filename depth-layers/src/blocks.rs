mod conv;
mod deconv;
mod upsample;

pub use conv::*;
pub use deconv::*;
pub use upsample::*;
