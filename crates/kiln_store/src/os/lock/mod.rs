use anyhow::{Result, bail};
use std::{
    ffi::CString,
    mem,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};

/// An exclusive file lock over a `.lock` file next to the path it guards.
///
/// A departing holder writes a byte into the lock file right before
/// unlinking it, so a waiter that acquired the flock on the old inode can
/// tell the file is stale and must be reopened.
pub struct PathLock {
    fd: libc::c_int,
    path: CString,
}

impl PathLock {
    /// take the lock, blocking until the current holder releases it
    pub fn exclusive<P>(p: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let p = p.as_ref();
        loop {
            let (fd, path) = PathLock::open_lock(p)?;
            if unsafe { libc::flock(fd, libc::LOCK_EX) } != 0 {
                unsafe { libc::close(fd) };
                bail!("could not lock file {:?}", p)
            }
            let mut stat = mem::MaybeUninit::<libc::stat>::uninit();
            if unsafe { libc::fstat(fd, stat.as_mut_ptr()) } != 0 {
                unsafe { libc::close(fd) };
                bail!("could not fstat lock file {:?}", p)
            }
            let stat = unsafe { stat.assume_init() };
            if stat.st_size != 0 {
                // stale lock, the holder unlinked it while we waited
                unsafe { libc::close(fd) };
                continue;
            }
            return Ok(PathLock { fd, path });
        }
    }

    fn open_lock<P>(p: P) -> Result<(libc::c_int, CString)>
    where
        P: AsRef<Path>,
    {
        let p = p.as_ref();
        let raw_path = p.as_os_str().as_bytes();
        let path = CString::new(raw_path)?;
        let fd = unsafe {
            libc::open(
                path.as_ptr(),
                libc::O_CLOEXEC | libc::O_RDWR | libc::O_CREAT,
                0o666,
            )
        };
        if fd < 0 {
            bail!("could not open lock file {:?}", p)
        }
        Ok((fd, path))
    }

    #[allow(clippy::unused_self)]
    #[inline]
    /// unlocks by running the destructor
    pub fn unlock(self) {}

    fn unlock_ref(&self) {
        unsafe {
            libc::unlink(self.path.as_ptr());
            libc::write(self.fd, b" ".as_ptr().cast::<libc::c_void>(), 1);
            libc::close(self.fd);
        }
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        self.unlock_ref();
    }
}

pub fn add_lock_ext<P>(path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let mut os_str = path.as_ref().as_os_str().to_os_string();
    os_str.push(".lock");
    os_str.into()
}
