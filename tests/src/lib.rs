pub mod util;

mod pipeline;
