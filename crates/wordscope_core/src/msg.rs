#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the URL text field.
    UrlSubmitted(String),
    /// User moved the minimum-frequency slider.
    MinFrequencyChanged(u64),
    /// User picked a chart type.
    ChartSelected(crate::ChartKind),
    /// Engine finished loading a document: tokens on success, the failure
    /// description otherwise.
    DocumentLoaded {
        request_id: crate::RequestId,
        result: Result<crate::LoadedDocument, String>,
    },
}
