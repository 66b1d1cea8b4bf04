// Domain-layer modules and shared errors/models
pub mod errors {
    pub use crate::errors::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod sentiment {
    pub use crate::sentiment::*;
}
