pub mod core {
    pub mod bits;
    pub mod functional;
    pub mod json_file_async;
    pub mod logging;
    pub mod persistence;
    pub mod telemetry;
    pub mod test_util;
}
