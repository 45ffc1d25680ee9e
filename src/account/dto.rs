use serde::Deserialize;

/// Request body for changing the current password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Request body for updating profile details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub full_name: String,
    pub email: String,
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn camel_case_fields_deserialize() {
        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(req.old_password, "a");
        assert_eq!(req.new_password, "b");

        let req: UpdateAccountRequest =
            serde_json::from_str(r#"{"fullName":"Alice A","email":"a@x.com"}"#).unwrap();
        assert_eq!(req.full_name, "Alice A");
    }
}
