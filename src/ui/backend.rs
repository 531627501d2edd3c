use std::sync::Arc;

use chimeboard::{
    app::{SoundDirectory, SoundMethods},
    domain::{CustomSoundEntry, MethodCallError, SoundRecord, SoundUploadRecord},
    infra::methods::MethodGateway,
};

use super::UNCONFIGURED_BACKEND_NOTICE;

pub(super) struct AdminBackend {
    pub(super) methods: Arc<dyn SoundMethods>,
    pub(super) directory: Arc<dyn SoundDirectory>,
    pub(super) startup_notice: Option<String>,
}

pub(super) fn build_admin_backend() -> AdminBackend {
    match MethodGateway::from_env() {
        Ok(gateway) => {
            let gateway = Arc::new(gateway);
            AdminBackend {
                methods: Arc::clone(&gateway) as Arc<dyn SoundMethods>,
                directory: gateway as Arc<dyn SoundDirectory>,
                startup_notice: None,
            }
        }
        Err(error) if is_missing_config_error(&error) => build_stub_backend(None),
        Err(error) => build_stub_backend(Some(format!(
            "Workspace gateway unavailable: {}",
            error.user_message()
        ))),
    }
}

fn build_stub_backend(extra_notice: Option<String>) -> AdminBackend {
    let stub = Arc::new(UnconfiguredGateway);
    let mut notices = vec![UNCONFIGURED_BACKEND_NOTICE.to_string()];
    notices.extend(extra_notice);

    AdminBackend {
        methods: Arc::clone(&stub) as Arc<dyn SoundMethods>,
        directory: stub as Arc<dyn SoundDirectory>,
        startup_notice: Some(notices.join(" ")),
    }
}

fn is_missing_config_error(error: &MethodCallError) -> bool {
    matches!(
        error,
        MethodCallError::Config { message } if message.contains("is missing")
    )
}

struct UnconfiguredGateway;

impl SoundMethods for UnconfiguredGateway {
    fn insert_or_update_sound(&self, _record: &SoundRecord) -> Result<String, MethodCallError> {
        Err(MethodCallError::config(UNCONFIGURED_BACKEND_NOTICE))
    }

    fn upload_custom_sound(
        &self,
        _contents: &[u8],
        _mime_type: &str,
        _record: &SoundUploadRecord,
    ) -> Result<(), MethodCallError> {
        Err(MethodCallError::config(UNCONFIGURED_BACKEND_NOTICE))
    }
}

impl SoundDirectory for UnconfiguredGateway {
    fn list_custom_sounds(&self) -> Result<Vec<CustomSoundEntry>, MethodCallError> {
        Err(MethodCallError::config(UNCONFIGURED_BACKEND_NOTICE))
    }
}
