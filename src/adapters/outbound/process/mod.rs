/// Process adapters for external tools
mod dotnet_restore;

pub use dotnet_restore::DotnetRestoreRunner;
