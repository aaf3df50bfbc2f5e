use serde::Deserialize;

use crate::domain::resource::Resource;
use crate::forms::{FormError, checked};

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    pub resource: String,
    /// One `columns` key per ticked column.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub include_header: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ExportRequest {
    pub resource: Resource,
    pub columns: Vec<String>,
    pub include_header: bool,
}

impl TryFrom<ExportForm> for ExportRequest {
    type Error = FormError;

    fn try_from(form: ExportForm) -> Result<Self, Self::Error> {
        let resource: Resource = form.resource.parse()?;
        Ok(Self {
            resource,
            include_header: checked(&form.include_header),
            columns: form.columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse_form;

    #[test]
    fn columns_and_header_flag_are_read() {
        let form: ExportForm =
            parse_form(b"resource=users&columns=name&columns=email&include_header=on").unwrap();
        let request = ExportRequest::try_from(form).unwrap();
        assert_eq!(request.resource, Resource::Users);
        assert_eq!(request.columns, vec!["name", "email"]);
        assert!(request.include_header);
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let form: ExportForm = parse_form(b"resource=inventory").unwrap();
        assert!(ExportRequest::try_from(form).is_err());
    }
}
