/// Read the response body as text, noting its size for diagnostics.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    endpoint: &str,
    tag: &str,
) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;
    tracing::trace!(endpoint, tag, bytes = text.len(), "response body received");
    Ok(text)
}
