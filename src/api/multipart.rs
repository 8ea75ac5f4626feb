//! Minimal `multipart/form-data` encoder for single-file uploads.

/// An encoded form ready to send with its matching content type.
pub(crate) struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    /// Encode one file part under `field`.
    pub(crate) fn single_file(
        field: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> Self {
        let boundary = format!("----chemviz-{}", uuid::Uuid::new_v4().simple());
        Self::with_boundary(boundary, field, file_name, content_type, contents)
    }

    fn with_boundary(
        boundary: String,
        field: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> Self {
        let mut body = Vec::with_capacity(contents.len() + 256);
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quoted(field),
                escape_quoted(file_name)
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Self { boundary, body }
    }

    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|ch| *ch != '\r' && *ch != '\n')
        .map(|ch| match ch {
            '"' => "%22".to_string(),
            other => other.to_string(),
        })
        .collect()
}
