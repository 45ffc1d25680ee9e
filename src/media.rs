use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::state::AppState;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Uploads a single image under `users/{kind}/` and returns its public URL.
pub async fn upload_image(st: &AppState, kind: &str, item: UploadItem) -> anyhow::Result<String> {
    anyhow::ensure!(!item.body.is_empty(), "empty image body");
    let ext = ext_from_mime(&item.content_type)
        .ok_or_else(|| anyhow::anyhow!("unsupported image type {}", item.content_type))?;
    let key = format!("users/{}/{}.{}", kind, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(st.storage.public_url(&key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod media_tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn upload_returns_public_url() {
        let state = AppState::fake();
        let url = upload_image(
            &state,
            "avatars",
            UploadItem {
                body: Bytes::from_static(b"\x89PNG"),
                content_type: "image/png".into(),
            },
        )
        .await
        .unwrap();
        assert!(url.starts_with("https://fake.local/users/avatars/"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn upload_rejects_empty_body_and_unknown_type() {
        let state = AppState::fake();
        let err = upload_image(
            &state,
            "avatars",
            UploadItem {
                body: Bytes::new(),
                content_type: "image/png".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("empty image body"));

        let err = upload_image(
            &state,
            "avatars",
            UploadItem {
                body: Bytes::from_static(b"data"),
                content_type: "text/plain".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("unsupported image type"));
    }
}
