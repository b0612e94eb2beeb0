mod client;

pub use client::HttpVaultApi;
