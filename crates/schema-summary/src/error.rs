/// An error turning an introspection response into a summary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("Introspection response does not contain data")]
    MissingData,

    #[error("Introspection data does not contain a __schema.types list")]
    MalformedSchema,
}
