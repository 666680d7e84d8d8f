#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch, extract and tokenize the document at `url`, then report back
    /// with `Msg::DocumentLoaded` carrying the same `request_id`.
    FetchDocument {
        request_id: crate::RequestId,
        url: String,
    },
}
