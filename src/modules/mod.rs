//! Infrastructure adapters. Currently only persistence.

pub mod storage;
