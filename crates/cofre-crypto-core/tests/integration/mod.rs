mod master_password_scenario;
mod record_roundtrip;
