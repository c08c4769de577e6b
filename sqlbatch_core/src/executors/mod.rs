mod batch;

pub use batch::BatchExecutor;
