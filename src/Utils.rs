/// Console logger set up once by the binary
pub mod logger;
