//! Postal code lookup response DTO (api.postalpincode.in shape).

use serde::{Deserialize, Serialize};

use crate::enrichment::PostalLocation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostOfficeDTO {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
}

/// One element of the top-level response array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostalResponse {
    #[serde(default)]
    pub status: String,
    /// `null` when the code is unknown.
    #[serde(default)]
    pub post_office: Option<Vec<PostOfficeDTO>>,
}

impl PostalResponse {
    /// City/state of the first post office, if the lookup succeeded.
    pub fn into_location(self) -> Option<PostalLocation> {
        if self.status != "Success" {
            return None;
        }
        let office = self.post_office?.into_iter().next()?;
        Some(PostalLocation {
            city: office.district.clone(),
            district: office.district,
            state: office.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_uses_first_post_office() {
        let body = r#"[{"Message":"Number of pincode(s) found:2","Status":"Success","PostOffice":[
            {"Name":"Shivajinagar","District":"Pune","State":"Maharashtra"},
            {"Name":"Deccan Gymkhana","District":"Pune","State":"Maharashtra"}]}]"#;
        let responses: Vec<PostalResponse> = serde_json::from_str(body).unwrap();
        let location = responses.into_iter().next().unwrap().into_location().unwrap();

        assert_eq!(location.city, "Pune");
        assert_eq!(location.district, "Pune");
        assert_eq!(location.state, "Maharashtra");
    }

    #[test]
    fn test_error_status_is_none() {
        let body = r#"[{"Message":"No records found","Status":"Error","PostOffice":null}]"#;
        let responses: Vec<PostalResponse> = serde_json::from_str(body).unwrap();
        assert!(responses.into_iter().next().unwrap().into_location().is_none());
    }

    #[test]
    fn test_empty_office_list_is_none() {
        let response = PostalResponse {
            status: "Success".to_string(),
            post_office: Some(Vec::new()),
        };
        assert!(response.into_location().is_none());
    }
}
