use super::{bind_bool, bind_int, bind_path, bind_string, bind_with, Link, PreferenceGroup};
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use std::path::PathBuf;

/// Single-instance remote command listener
#[derive(Debug)]
pub struct RemotePreferences {
    pub port: Property<i32>,
    pub use_remote_server: Property<bool>,
}

impl PreferenceGroup for RemotePreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            port: Property::new(shared.store.get_int(REMOTE_SERVER_PORT)),
            use_remote_server: Property::new(shared.store.get_bool(USE_REMOTE_SERVER)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_int(&self.port, link, REMOTE_SERVER_PORT);
        bind_bool(&self.use_remote_server, link, USE_REMOTE_SERVER);
    }
}

/// HTTP proxy settings
///
/// The password never touches the plain store. It lives encrypted in the
/// vault and only while `persist_password` is on; otherwise it is kept for
/// the session in memory.
#[derive(Debug)]
pub struct ProxyPreferences {
    pub use_proxy: Property<bool>,
    pub hostname: Property<String>,
    pub port: Property<String>,
    pub use_authentication: Property<bool>,
    pub username: Property<String>,
    pub password: Property<String>,
    pub persist_password: Property<bool>,
}

impl PreferenceGroup for ProxyPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let persist = store.get_bool(PROXY_PERSIST_PASSWORD);
        let password = if persist {
            shared
                .credentials
                .get_secret(
                    PROXY_SECRET_NAMESPACE,
                    PROXY_SECRET_ACCOUNT,
                    &shared.user_and_host(),
                )
                .unwrap_or_default()
        } else {
            String::new()
        };

        Self {
            use_proxy: Property::new(store.get_bool(PROXY_USE)),
            hostname: Property::new(store.get_string(PROXY_HOSTNAME)),
            port: Property::new(store.get_string(PROXY_PORT)),
            use_authentication: Property::new(store.get_bool(PROXY_USE_AUTHENTICATION)),
            username: Property::new(store.get_string(PROXY_USERNAME)),
            password: Property::new(password),
            persist_password: Property::new(persist),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.use_proxy, link, PROXY_USE);
        bind_string(&self.hostname, link, PROXY_HOSTNAME);
        bind_string(&self.port, link, PROXY_PORT);
        bind_bool(&self.use_authentication, link, PROXY_USE_AUTHENTICATION);
        bind_string(&self.username, link, PROXY_USERNAME);
        bind_with(&self.password, link, |s, password| {
            if s.store.get_bool(PROXY_PERSIST_PASSWORD) {
                s.credentials.set_secret(
                    PROXY_SECRET_NAMESPACE,
                    PROXY_SECRET_ACCOUNT,
                    password,
                    &s.user_and_host(),
                );
            }
        });
        bind_with(&self.persist_password, link, |s, persist| {
            s.store.put_bool(PROXY_PERSIST_PASSWORD, *persist);
            if !*persist {
                s.credentials
                    .delete_secret(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT);
            }
        });
    }
}

#[derive(Debug)]
pub struct SslPreferences {
    pub truststore_path: Property<PathBuf>,
}

impl PreferenceGroup for SslPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            truststore_path: Property::new(PathBuf::from(shared.store.get_string(TRUSTSTORE_PATH))),
        }
    }

    fn bind(&self, link: &Link) {
        bind_path(&self.truststore_path, link, TRUSTSTORE_PATH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::Fixture;

    #[test]
    fn test_password_not_persisted_by_default() {
        let fx = Fixture::new();
        fx.prefs.proxy().password.set("hunter2".to_string());
        assert!(fx.vault.stored(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT).is_none());
        assert!(!fx.prefs.store().has_key(PROXY_PASSWORD));
        assert_eq!(fx.reopen().proxy().password.get(), "");
    }

    #[test]
    fn test_persisted_password_survives_restart() {
        let fx = Fixture::new();
        let proxy = fx.prefs.proxy();
        proxy.persist_password.set(true);
        proxy.password.set(" hunter2 ".to_string());

        let stored = fx
            .vault
            .stored(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT)
            .unwrap();
        assert!(!stored.contains("hunter2"));
        assert_eq!(fx.reopen().proxy().password.get(), "hunter2");
        assert_eq!(fx.vault.live_handles(), 0);
    }

    #[test]
    fn test_disabling_persistence_deletes_secret() {
        let fx = Fixture::new();
        let proxy = fx.prefs.proxy();
        proxy.persist_password.set(true);
        proxy.password.set("hunter2".to_string());
        proxy.persist_password.set(false);
        assert!(fx.vault.stored(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT).is_none());
    }

    #[test]
    fn test_password_set_before_persist_stays_in_memory() {
        let fx = Fixture::new();
        let proxy = fx.prefs.proxy();
        proxy.password.set("hunter2".to_string());
        proxy.persist_password.set(true);

        assert!(fx.vault.stored(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT).is_none());
        assert_eq!(proxy.password.get(), "hunter2");
        assert_eq!(fx.reopen().proxy().password.get(), "");
    }

    #[test]
    fn test_owner_change_hides_secret() {
        let fx = Fixture::new();
        let proxy = fx.prefs.proxy();
        proxy.persist_password.set(true);
        proxy.password.set("hunter2".to_string());

        fx.prefs.owner().default_owner.set("mallory".to_string());
        assert_eq!(fx.reopen().proxy().password.get(), "");
    }

    #[test]
    fn test_remote_port() {
        let fx = Fixture::new();
        assert_eq!(fx.prefs.remote().port.get(), 6050);
        fx.prefs.remote().port.set(6051);
        assert_eq!(fx.prefs.store().get_int(REMOTE_SERVER_PORT), 6051);
    }
}
