pub mod postgis;
pub mod storage;
