//! Text control surface.
//!
//! Exposes the registry as four small files:
//! - `devices` -- read: one `<major>:<minor>` line per registered device
//! - `register` -- write `<major>:<minor>`: add a trigger
//! - `unregister` -- write `<major>:<minor>`: remove a trigger
//! - `trigger` -- write `<major>:<minor>`: fire a pulse by hand
//!
//! Reads follow procfs conventions: the content is regenerated on each call
//! and served from `offset`, returning 0 at end of file. A successful write
//! consumes the whole payload.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write as _;

use bitflags::bitflags;
use devtrig_core::DevId;

use crate::backend::TriggerBackend;
use crate::config::MAX_WRITE_LEN;
use crate::error::TriggerError;
use crate::registry::Registry;

bitflags! {
    /// Directions an endpoint supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EndpointMode: u8 {
        /// Endpoint can be read.
        const READ  = 1 << 0;
        /// Endpoint can be written.
        const WRITE = 1 << 1;
    }
}

/// A control-surface endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Lists registered devices.
    Devices,
    /// Adds a trigger.
    Register,
    /// Removes a trigger.
    Unregister,
    /// Fires a trigger.
    Trigger,
}

impl Endpoint {
    /// Every endpoint, in directory order.
    pub const ALL: [Self; 4] = [
        Self::Devices,
        Self::Register,
        Self::Unregister,
        Self::Trigger,
    ];

    /// Returns the endpoint's file name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Register => "register",
            Self::Unregister => "unregister",
            Self::Trigger => "trigger",
        }
    }

    /// Looks an endpoint up by file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ep| ep.name() == name)
    }

    /// Returns the directions the endpoint supports.
    pub const fn mode(self) -> EndpointMode {
        match self {
            Self::Devices => EndpointMode::READ,
            Self::Register | Self::Unregister | Self::Trigger => EndpointMode::WRITE,
        }
    }
}

/// Parses a `<major>:<minor>` control payload.
///
/// Surrounding ASCII whitespace (such as the newline `echo` appends) is
/// ignored. Both fields must be unsigned decimal numbers that fit a `u32`.
///
/// # Errors
///
/// Returns [`TriggerError::InvalidArgument`] for empty or oversized input,
/// or anything that is not exactly two numeric fields separated by `:`.
pub fn parse_dev_id(input: &[u8]) -> Result<DevId, TriggerError> {
    if input.is_empty() || input.len() > MAX_WRITE_LEN {
        return Err(TriggerError::InvalidArgument);
    }
    let text = core::str::from_utf8(input)
        .map_err(|_| TriggerError::InvalidArgument)?
        .trim_ascii();
    let (major, minor) = text.split_once(':').ok_or(TriggerError::InvalidArgument)?;
    Ok(DevId::new(parse_field(major)?, parse_field(minor)?))
}

fn parse_field(field: &str) -> Result<u32, TriggerError> {
    // `u32::from_str` would also take a leading '+'.
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TriggerError::InvalidArgument);
    }
    field.parse().map_err(|_| TriggerError::InvalidArgument)
}

/// The control surface of one registry.
pub struct ControlSurface<B: TriggerBackend> {
    registry: Arc<Registry<B>>,
}

impl<B: TriggerBackend> Clone for ControlSurface<B> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<B: TriggerBackend> ControlSurface<B> {
    /// Creates a control surface for `registry`.
    pub fn new(registry: Arc<Registry<B>>) -> Self {
        Self { registry }
    }

    /// Returns the registry behind this surface.
    pub fn registry(&self) -> &Arc<Registry<B>> {
        &self.registry
    }

    /// Looks up an endpoint by file name.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::NotFound`] for unknown names.
    pub fn lookup(&self, name: &str) -> Result<Endpoint, TriggerError> {
        Endpoint::from_name(name).ok_or(TriggerError::NotFound)
    }

    /// Lists the endpoint directory: each file name with its access mode.
    pub fn endpoints(&self) -> impl Iterator<Item = (&'static str, EndpointMode)> {
        Endpoint::ALL.into_iter().map(|ep| (ep.name(), ep.mode()))
    }

    /// Renders the `devices` file.
    pub fn render_devices(&self) -> String {
        let mut out = String::new();
        for dev in self.registry.list() {
            let _ = writeln!(out, "{dev}");
        }
        out
    }

    /// Reads from `endpoint` starting at `offset`.
    ///
    /// Returns the number of bytes copied into `buf`, or 0 at end of file.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::PermissionDenied`] for write-only endpoints.
    pub fn read(&self, endpoint: Endpoint, offset: usize, buf: &mut [u8]) -> Result<usize, TriggerError> {
        if !endpoint.mode().contains(EndpointMode::READ) {
            return Err(TriggerError::PermissionDenied);
        }
        let content = self.render_devices();
        let bytes = content.as_bytes();
        if offset >= bytes.len() {
            return Ok(0);
        }
        let available = &bytes[offset..];
        let to_copy = buf.len().min(available.len());
        buf[..to_copy].copy_from_slice(&available[..to_copy]);
        Ok(to_copy)
    }

    /// Writes a `<major>:<minor>` command to `endpoint`.
    ///
    /// Duplicate registrations, unknown devices, backend failures and dropped
    /// pulses all count as success here; they are logged by the registry.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::PermissionDenied`] for read-only endpoints and
    /// [`TriggerError::InvalidArgument`] for malformed payloads; neither
    /// changes any state.
    pub fn write(&self, endpoint: Endpoint, buf: &[u8]) -> Result<usize, TriggerError> {
        if !endpoint.mode().contains(EndpointMode::WRITE) {
            return Err(TriggerError::PermissionDenied);
        }
        let dev = parse_dev_id(buf)?;
        match endpoint {
            Endpoint::Register => {
                self.registry.add(dev);
            }
            Endpoint::Unregister => {
                self.registry.remove(dev);
            }
            Endpoint::Trigger => {
                self.registry.fire(dev);
            }
            Endpoint::Devices => return Err(TriggerError::PermissionDenied),
        }
        Ok(buf.len())
    }

    /// Reads from the endpoint called `name`.
    ///
    /// # Errors
    ///
    /// See [`lookup`](Self::lookup) and [`read`](Self::read).
    pub fn read_named(&self, name: &str, offset: usize, buf: &mut [u8]) -> Result<usize, TriggerError> {
        self.read(self.lookup(name)?, offset, buf)
    }

    /// Writes to the endpoint called `name`.
    ///
    /// # Errors
    ///
    /// See [`lookup`](Self::lookup) and [`write`](Self::write).
    pub fn write_named(&self, name: &str, buf: &[u8]) -> Result<usize, TriggerError> {
        self.write(self.lookup(name)?, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    struct Quiet;

    impl TriggerBackend for Quiet {
        type Handle = ();

        fn register(&self, _name: &str) -> Result<(), BackendError> {
            Ok(())
        }

        fn unregister(&self, _handle: ()) {}

        fn blink_oneshot(&self, _handle: &(), _on: u64, _off: u64, _invert: bool) {}
    }

    fn surface() -> ControlSurface<Quiet> {
        ControlSurface::new(Arc::new(Registry::new(Quiet)))
    }

    #[test]
    fn parse_accepts_plain_and_newline() {
        assert_eq!(parse_dev_id(b"8:1"), Ok(DevId::new(8, 1)));
        assert_eq!(parse_dev_id(b"179:0\n"), Ok(DevId::new(179, 0)));
        assert_eq!(parse_dev_id(b" 8:16 "), Ok(DevId::new(8, 16)));
        assert_eq!(
            parse_dev_id(b"4294967295:7"),
            Ok(DevId::new(u32::MAX, 7))
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        let cases: &[&[u8]] = &[
            b"abc",
            b"8",
            b"8:",
            b":1",
            b"8:1:2",
            b"8 :1",
            b"+8:1",
            b"8:-1",
            b"0x8:1",
            b"4294967296:0",
            b"\n",
        ];
        for bad in cases {
            assert_eq!(parse_dev_id(bad), Err(TriggerError::InvalidArgument), "{bad:?}");
        }
    }

    #[test]
    fn parse_rejects_size_bounds() {
        assert_eq!(parse_dev_id(b""), Err(TriggerError::InvalidArgument));
        // 21 bytes.
        assert_eq!(
            parse_dev_id(b"000000000000000008:1\n"),
            Err(TriggerError::InvalidArgument)
        );
        // Exactly 20 bytes is accepted.
        assert_eq!(
            parse_dev_id(b"0000000000000008:01\n"),
            Ok(DevId::new(8, 1))
        );
    }

    #[test]
    fn endpoint_names_round_trip() {
        for ep in Endpoint::ALL {
            assert_eq!(Endpoint::from_name(ep.name()), Some(ep));
        }
        assert_eq!(Endpoint::from_name("brightness"), None);
    }

    #[test]
    fn endpoint_directory() {
        let ctl = surface();
        let listing: Vec<_> = ctl.endpoints().collect();
        assert_eq!(
            listing,
            [
                ("devices", EndpointMode::READ),
                ("register", EndpointMode::WRITE),
                ("unregister", EndpointMode::WRITE),
                ("trigger", EndpointMode::WRITE),
            ]
        );
        for (name, _) in listing {
            assert!(ctl.lookup(name).is_ok());
        }
    }

    #[test]
    fn register_write_reports_length() {
        let ctl = surface();
        assert_eq!(ctl.write(Endpoint::Register, b"8:1\n"), Ok(4));
        assert_eq!(ctl.registry().list(), vec![DevId::new(8, 1)]);
        // Duplicate still succeeds.
        assert_eq!(ctl.write(Endpoint::Register, b"8:1"), Ok(3));
        assert_eq!(ctl.registry().len(), 1);
    }

    #[test]
    fn malformed_register_changes_nothing() {
        let ctl = surface();
        assert_eq!(
            ctl.write(Endpoint::Register, b"abc"),
            Err(TriggerError::InvalidArgument)
        );
        assert!(ctl.registry().is_empty());
    }

    #[test]
    fn unregister_and_trigger() {
        let ctl = surface();
        ctl.write(Endpoint::Register, b"8:1").unwrap();
        assert_eq!(ctl.write(Endpoint::Trigger, b"8:1"), Ok(3));
        assert_eq!(ctl.registry().stats().fired, 1);
        assert_eq!(ctl.write(Endpoint::Unregister, b"8:1"), Ok(3));
        assert!(ctl.registry().is_empty());
        // Absent devices are silent no-ops.
        assert_eq!(ctl.write(Endpoint::Unregister, b"8:1"), Ok(3));
        assert_eq!(ctl.write(Endpoint::Trigger, b"8:1"), Ok(3));
    }

    #[test]
    fn devices_listing() {
        let ctl = surface();
        ctl.write(Endpoint::Register, b"8:0").unwrap();
        ctl.write(Endpoint::Register, b"179:0").unwrap();
        ctl.write(Endpoint::Register, b"8:16").unwrap();
        assert_eq!(ctl.render_devices(), "8:0\n8:16\n179:0\n");

        let mut buf = [0u8; 64];
        let n = ctl.read(Endpoint::Devices, 0, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"8:0\n8:16\n179:0\n");
    }

    #[test]
    fn devices_read_with_offset() {
        let ctl = surface();
        ctl.write(Endpoint::Register, b"8:0").unwrap();
        ctl.write(Endpoint::Register, b"8:1").unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(ctl.read(Endpoint::Devices, 0, &mut buf), Ok(3));
        assert_eq!(&buf, b"8:0");
        assert_eq!(ctl.read(Endpoint::Devices, 4, &mut buf), Ok(3));
        assert_eq!(&buf, b"8:1");
        assert_eq!(ctl.read(Endpoint::Devices, 8, &mut buf), Ok(0));
    }

    #[test]
    fn empty_devices_reads_nothing() {
        let ctl = surface();
        let mut buf = [0u8; 8];
        assert_eq!(ctl.read(Endpoint::Devices, 0, &mut buf), Ok(0));
    }

    #[test]
    fn direction_is_enforced() {
        let ctl = surface();
        let mut buf = [0u8; 8];
        assert_eq!(
            ctl.read(Endpoint::Register, 0, &mut buf),
            Err(TriggerError::PermissionDenied)
        );
        assert_eq!(
            ctl.write(Endpoint::Devices, b"8:1"),
            Err(TriggerError::PermissionDenied)
        );
        assert!(ctl.registry().is_empty());
    }

    #[test]
    fn named_access() {
        let ctl = surface();
        assert_eq!(ctl.write_named("register", b"8:1"), Ok(3));
        let mut buf = [0u8; 8];
        assert_eq!(ctl.read_named("devices", 0, &mut buf), Ok(4));
        assert_eq!(
            ctl.write_named("brightness", b"1"),
            Err(TriggerError::NotFound)
        );
    }
}
