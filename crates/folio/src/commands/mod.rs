//! CLI command implementations.

pub(crate) mod export;
pub(crate) mod generate_meta;
pub(crate) mod generate_openapi;
pub(crate) mod serve;

pub(crate) use export::ExportArgs;
pub(crate) use generate_meta::GenerateMetaArgs;
pub(crate) use generate_openapi::GenerateOpenApiArgs;
pub(crate) use serve::ServeArgs;
