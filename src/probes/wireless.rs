//! Wireless link quality via the wireless-extensions ioctl interface.
//!
//! The probe decides whether an interface is wireless by asking for its
//! associated access point: drivers without wireless extensions reject that
//! ioctl, which is reported as `None` rather than a failure. The request
//! structs mirror `linux/wireless.h`; libc does not ship them.

use std::io;
use std::mem;
use std::net::UdpSocket;
use std::os::fd::{AsRawFd, RawFd};
use std::ptr;

use crate::probes::ProbeError;

const SIOCGIWRANGE: libc::c_ulong = 0x8B0B;
const SIOCGIWSTATS: libc::c_ulong = 0x8B0F;
const SIOCGIWAP: libc::c_ulong = 0x8B15;

/// Quality field not filled in by the driver.
const IW_QUAL_QUAL_INVALID: u8 = 0x10;
/// Level carries an offset-encoded dBm value.
const IW_QUAL_DBM: u8 = 0x08;

const IFNAMSIZ: usize = 16;
const RANGE_BUF: usize = 1024;

#[repr(C)]
#[derive(Clone, Copy)]
struct IwQuality {
    qual: u8,
    level: u8,
    noise: u8,
    updated: u8,
}

#[repr(C)]
#[derive(Clone, Copy)]
struct IwPoint {
    pointer: *mut libc::c_void,
    length: u16,
    flags: u16,
}

#[repr(C)]
#[allow(dead_code)] // kernel-written layout, only partially read back
union IwReqData {
    data: IwPoint,
    _pad: [u8; 16],
}

#[repr(C)]
#[allow(dead_code)]
struct IwReq {
    ifr_name: [u8; IFNAMSIZ],
    u: IwReqData,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IwStatistics {
    status: u16,
    qual: IwQuality,
    discard: [u32; 5],
    miss: u32,
}

/// Prefix of `struct iw_range`, through the quality ceilings.
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IwRangePrefix {
    throughput: u32,
    min_nwid: u32,
    max_nwid: u32,
    old_num_channels: u16,
    old_num_frequency: u8,
    scan_capa: u8,
    event_capa: [u32; 6],
    sensitivity: i32,
    max_qual: IwQuality,
    avg_qual: IwQuality,
}

/// Link quality 0-100 for `ifname`, or `None` when the interface has no
/// wireless extensions. Any ioctl failure past the wirelessness check is a
/// hard probe failure.
pub fn link_quality(ifname: &str) -> Result<Option<u8>, ProbeError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(|e| ProbeError::read("socket", e))?;
    let fd = socket.as_raw_fd();

    let mut req = request(ifname);
    // SAFETY: req is a fully initialized iwreq and outlives the call
    if unsafe { libc::ioctl(fd, SIOCGIWAP as _, &mut req) } == -1 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(libc::EOPNOTSUPP) | Some(libc::ENOTTY) | Some(libc::EINVAL) => Ok(None),
            _ => Err(ProbeError::read("ioctl", err)),
        };
    }

    let mut stats: IwStatistics = unsafe { mem::zeroed() };
    let mut req = request(ifname);
    req.u.data = IwPoint {
        pointer: &mut stats as *mut IwStatistics as *mut libc::c_void,
        length: mem::size_of::<IwStatistics>() as u16,
        flags: 1,
    };
    // SAFETY: the data pointer stays valid for the duration of the call
    if unsafe { libc::ioctl(fd, SIOCGIWSTATS as _, &mut req) } == -1 {
        return Err(ProbeError::read("ioctl", io::Error::last_os_error()));
    }

    Ok(Some(quality_percent(
        &stats.qual,
        driver_max_quality(fd, ifname),
    )))
}

/// The driver's advertised quality ceiling, 0 when unavailable.
fn driver_max_quality(fd: RawFd, ifname: &str) -> u8 {
    let mut buf = [0u8; RANGE_BUF];
    let mut req = request(ifname);
    req.u.data = IwPoint {
        pointer: buf.as_mut_ptr() as *mut libc::c_void,
        length: RANGE_BUF as u16,
        flags: 0,
    };
    // SAFETY: buf outlives the call and is at least as long as advertised
    if unsafe { libc::ioctl(fd, SIOCGIWRANGE as _, &mut req) } == -1 {
        return 0;
    }
    // SAFETY: the kernel filled at least the fixed-layout prefix
    let range = unsafe { ptr::read_unaligned(buf.as_ptr() as *const IwRangePrefix) };
    range.max_qual.qual
}

/// Quality percentage: the driver's own ratio when it advertises a
/// normalized ceiling, otherwise the piecewise dBm map.
fn quality_percent(qual: &IwQuality, max_qual: u8) -> u8 {
    if max_qual > 0 && qual.updated & IW_QUAL_QUAL_INVALID == 0 {
        return ((u32::from(qual.qual) * 100) / u32::from(max_qual)).min(100) as u8;
    }
    let dbm = if qual.updated & IW_QUAL_DBM != 0 {
        i32::from(qual.level) - 0x100
    } else {
        i32::from(qual.level as i8)
    };
    rssi_to_quality(dbm)
}

/// Piecewise linear received-signal-strength to quality map.
pub(crate) fn rssi_to_quality(dbm: i32) -> u8 {
    if dbm >= -50 {
        100
    } else if dbm <= -100 {
        0
    } else {
        (2 * (dbm + 100)) as u8
    }
}

fn request(ifname: &str) -> IwReq {
    // SAFETY: all-zero bytes are a valid iwreq
    let mut req: IwReq = unsafe { mem::zeroed() };
    let bytes = ifname.as_bytes();
    let n = bytes.len().min(IFNAMSIZ - 1);
    req.ifr_name[..n].copy_from_slice(&bytes[..n]);
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rssi_piecewise() {
        assert_eq!(rssi_to_quality(-50), 100);
        assert_eq!(rssi_to_quality(-100), 0);
        assert_eq!(rssi_to_quality(-75), 50);
        assert_eq!(rssi_to_quality(-99), 2);
        assert_eq!(rssi_to_quality(-51), 98);
    }

    #[test]
    fn clamps_rssi_outside_the_ramp() {
        assert_eq!(rssi_to_quality(-40), 100);
        assert_eq!(rssi_to_quality(0), 100);
        assert_eq!(rssi_to_quality(-120), 0);
    }

    #[test]
    fn prefers_the_driver_ratio_when_a_ceiling_exists() {
        let qual = IwQuality {
            qual: 35,
            level: 0,
            noise: 0,
            updated: 0,
        };
        assert_eq!(quality_percent(&qual, 70), 50);
    }

    #[test]
    fn falls_back_to_dbm_without_a_ceiling() {
        // 196 - 256 = -60 dBm -> 2 * (-60 + 100) = 80
        let qual = IwQuality {
            qual: 0,
            level: 196,
            noise: 0,
            updated: IW_QUAL_DBM,
        };
        assert_eq!(quality_percent(&qual, 0), 80);
    }

    #[test]
    fn invalid_quality_flag_forces_the_dbm_path() {
        let qual = IwQuality {
            qual: 60,
            level: 196,
            noise: 0,
            updated: IW_QUAL_QUAL_INVALID | IW_QUAL_DBM,
        };
        assert_eq!(quality_percent(&qual, 70), 80);
    }
}
