//! Player identity.
//!
//! A [`PlayerId`] is an opaque token the client invents for itself. It is
//! created once per session and never changes while the session lives. The
//! server treats it as a label and does not check uniqueness; collisions are
//! assumed negligible.
//!
//! The token is held in an explicit [`Identity`] value that is passed by
//! reference into the connection and client constructors. Only
//! [`IdentityStore`] touches persistent storage, and only at startup.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::{env::Environment, error::IdentityError};

/// Opaque player token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an existing token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PlayerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PlayerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The local player's identity for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    player_id: PlayerId,
}

impl Identity {
    /// Use an existing token.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self { player_id: PlayerId::new(player_id) }
    }

    /// Generate a fresh token: `<random hex>-<wall clock millis hex>`.
    ///
    /// The random part is 52 bits wide.
    pub fn generate<E: Environment>(env: &E) -> Self {
        let random = env.random_u64() >> 12;
        let millis = env.wall_clock_millis();
        Self::new(format!("{random:x}-{millis:x}"))
    }

    /// The player token.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Whether `id` names this player.
    pub fn is(&self, id: &str) -> bool {
        self.player_id == id
    }
}

/// Session-scoped identity persistence.
///
/// Loads the token from a file, generating and writing one only when the file
/// is missing or empty.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored identity or create and persist a new one.
    pub fn load_or_create<E: Environment>(&self, env: &E) -> Result<Identity, IdentityError> {
        if let Some(identity) = self.load()? {
            tracing::debug!(player_id = %identity.player_id(), "loaded session identity");
            return Ok(identity);
        }

        let identity = Identity::generate(env);
        self.save(&identity)?;
        tracing::info!(player_id = %identity.player_id(), path = %self.path.display(), "created session identity");
        Ok(identity)
    }

    fn load(&self) -> Result<Option<Identity>, IdentityError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| Identity::new(token)))
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(IdentityError::Read { path: self.path.clone(), source }),
        }
    }

    fn save(&self, identity: &Identity) -> Result<(), IdentityError> {
        let write_err = |source| IdentityError::Write { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, identity.player_id().as_str()).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[derive(Clone)]
    struct FixedEnv;

    impl Environment for FixedEnv {
        type Instant = Instant;

        fn now(&self) -> Instant {
            Instant::now()
        }

        fn wall_clock_millis(&self) -> u64 {
            0x18c_0000_0000
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0xab);
        }
    }

    #[test]
    fn generated_token_has_random_and_time_parts() {
        let identity = Identity::generate(&FixedEnv);
        assert_eq!(identity.player_id().as_str(), "ababababababa-18c00000000");
    }

    #[test]
    fn is_compares_token() {
        let identity = Identity::new("p1");
        assert!(identity.is("p1"));
        assert!(!identity.is("p2"));
    }

    #[test]
    fn store_creates_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::new(dir.path().join("session").join("player-id"));

        let first = store.load_or_create(&FixedEnv).unwrap();
        assert!(store.path().exists());

        let second = store.load_or_create(&FixedEnv).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn store_keeps_existing_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player-id");
        fs::write(&path, "existing-token\n").unwrap();

        let identity = IdentityStore::new(&path).load_or_create(&FixedEnv).unwrap();
        assert_eq!(identity.player_id().as_str(), "existing-token");
    }

    #[test]
    fn store_regenerates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player-id");
        fs::write(&path, "   ").unwrap();

        let identity = IdentityStore::new(&path).load_or_create(&FixedEnv).unwrap();
        assert_eq!(identity, Identity::generate(&FixedEnv));
        assert_eq!(fs::read_to_string(&path).unwrap(), identity.player_id().as_str());
    }
}
