//! Generated gRPC messages and stubs, plus conversions to the shared
//! domain type.

tonic::include_proto!("mailgate.v1");

impl From<EmailEntry> for common::EmailEntry {
    fn from(e: EmailEntry) -> Self {
        Self { email: e.email, confirmed_at: e.confirmed_at }
    }
}

impl From<common::EmailEntry> for EmailEntry {
    fn from(e: common::EmailEntry) -> Self {
        Self { email: e.email, confirmed_at: e.confirmed_at }
    }
}
