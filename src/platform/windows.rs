/*!
 * Windows Platform
 * Job objects, handle-list attributes and suspended process creation
 */

use std::ffi::{OsStr, OsString};
use std::io;
use std::mem;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::ptr;

use tracing::debug;
use windows_sys::Win32::Foundation::{CloseHandle, ERROR_INSUFFICIENT_BUFFER, HANDLE, WAIT_OBJECT_0};
use windows_sys::Win32::Storage::FileSystem::SearchPathW;
use windows_sys::Win32::System::Console::{
    GetStdHandle, STD_ERROR_HANDLE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
};
use windows_sys::Win32::System::JobObjects::{
    AssignProcessToJobObject, CreateJobObjectW, JobObjectBasicLimitInformation,
    SetInformationJobObject, JOBOBJECT_BASIC_LIMIT_INFORMATION, JOB_OBJECT_LIMIT_AFFINITY,
};
use windows_sys::Win32::System::Threading::{
    CreateProcessW, DeleteProcThreadAttributeList, GetCurrentProcess, GetExitCodeProcess,
    GetProcessAffinityMask, InitializeProcThreadAttributeList, ResumeThread, TerminateProcess,
    UpdateProcThreadAttribute, WaitForSingleObject, CREATE_SUSPENDED, CREATE_UNICODE_ENVIRONMENT,
    EXTENDED_STARTUPINFO_PRESENT, INFINITE, LPPROC_THREAD_ATTRIBUTE_LIST, PROCESS_INFORMATION,
    PROC_THREAD_ATTRIBUTE_HANDLE_LIST, STARTF_USESTDHANDLES, STARTUPINFOEXW, STARTUPINFOW,
};

use crate::core::guard::ResourceGuard;
use crate::launcher::{
    AffinityMask, AttributeBuffer, CommandLine, InheritList, Platform, SearchOutcome, StdHandles,
};

/// Job object owned by the launcher
#[derive(Debug)]
pub struct JobObject(ResourceGuard<HANDLE>);

/// Initialised `PROC_THREAD_ATTRIBUTE_LIST`
///
/// Owns both the list storage and the handle array registered in it: the OS
/// reads that array through the list until the list is deleted.
#[derive(Debug)]
pub struct AttributeList {
    guard: ResourceGuard<AttributeStorage>,
    raw: LPPROC_THREAD_ATTRIBUTE_LIST,
}

#[derive(Debug)]
struct AttributeStorage {
    buffer: AttributeBuffer,
    allowed: Option<Box<[HANDLE; 3]>>,
}

/// Child process and its initial thread
#[derive(Debug)]
pub struct ChildProcess {
    process: ResourceGuard<HANDLE>,
    thread: ResourceGuard<HANDLE>,
    pid: u32,
}

/// [`Platform`] backed by the Win32 API
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        Self
    }
}

fn close_on_drop(resource_type: &'static str, handle: HANDLE) -> ResourceGuard<HANDLE> {
    ResourceGuard::new(resource_type, handle, |handle: &mut HANDLE| {
        // SAFETY: the guard is the only owner of the handle and closes it once.
        if unsafe { CloseHandle(*handle) } == 0 {
            Err(io::Error::last_os_error().to_string())
        } else {
            Ok(())
        }
    })
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(Some(0)).collect()
}

fn check(ok: i32) -> io::Result<()> {
    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

impl Platform for WindowsPlatform {
    type Handle = HANDLE;
    type Containment = JobObject;
    type AttributeList = AttributeList;
    type Child = ChildProcess;

    fn affinity_mask(&self) -> io::Result<AffinityMask> {
        let mut process_mask = 0usize;
        let mut system_mask = 0usize;

        // SAFETY: the pseudo-handle is always valid and both out-pointers are live locals.
        check(unsafe { GetProcessAffinityMask(GetCurrentProcess(), &mut process_mask, &mut system_mask) })?;

        debug!(process_mask, system_mask, "Queried affinity mask");
        Ok(AffinityMask::new(process_mask))
    }

    fn create_containment(&self) -> io::Result<JobObject> {
        // SAFETY: null attributes and a null name create an anonymous job object.
        let job = unsafe { CreateJobObjectW(ptr::null(), ptr::null()) };
        if job.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(JobObject(close_on_drop("job", job)))
    }

    fn restrict_affinity(&self, job: &JobObject, mask: AffinityMask) -> io::Result<()> {
        // SAFETY: all-zero is a valid JOBOBJECT_BASIC_LIMIT_INFORMATION.
        let mut limits: JOBOBJECT_BASIC_LIMIT_INFORMATION = unsafe { mem::zeroed() };
        limits.LimitFlags = JOB_OBJECT_LIMIT_AFFINITY;
        limits.Affinity = mask.bits();

        // SAFETY: the job handle is open and `limits` matches the information class.
        check(unsafe {
            SetInformationJobObject(
                *job.0.get(),
                JobObjectBasicLimitInformation,
                ptr::addr_of!(limits).cast(),
                mem::size_of::<JOBOBJECT_BASIC_LIMIT_INFORMATION>() as u32,
            )
        })
    }

    fn std_handles(&self) -> StdHandles<HANDLE> {
        // SAFETY: GetStdHandle only reads process parameters.
        unsafe {
            StdHandles::new(
                GetStdHandle(STD_INPUT_HANDLE),
                GetStdHandle(STD_OUTPUT_HANDLE),
                GetStdHandle(STD_ERROR_HANDLE),
            )
        }
    }

    fn attribute_list_size(&self, count: u32) -> io::Result<usize> {
        let mut size = 0usize;

        // SAFETY: a null list asks only for the required size.
        let ok = unsafe { InitializeProcThreadAttributeList(ptr::null_mut(), count, 0, &mut size) };
        if ok == 0 {
            let err = io::Error::last_os_error();
            // Sizing always reports an insufficient buffer
            if err.raw_os_error() != Some(ERROR_INSUFFICIENT_BUFFER as i32) {
                return Err(err);
            }
        }
        Ok(size)
    }

    fn initialize_attribute_list(&self, mut buffer: AttributeBuffer, count: u32) -> io::Result<AttributeList> {
        let raw: LPPROC_THREAD_ATTRIBUTE_LIST = buffer.as_mut_ptr();
        let mut size = buffer.size();

        // SAFETY: `buffer` is writable for `size` bytes, the size the OS asked for.
        check(unsafe { InitializeProcThreadAttributeList(raw, count, 0, &mut size) })?;

        let storage = AttributeStorage {
            buffer,
            allowed: None,
        };
        let guard = ResourceGuard::new("attribute_list", storage, |storage: &mut AttributeStorage| {
            // SAFETY: the list was initialised and is deleted exactly once, before its storage is freed.
            unsafe { DeleteProcThreadAttributeList(storage.buffer.as_mut_ptr()) };
            Ok(())
        });

        Ok(AttributeList { guard, raw })
    }

    fn inherit_only(&self, attributes: &mut AttributeList, handles: InheritList<HANDLE>) -> io::Result<()> {
        let storage = attributes.guard.get_mut();
        let list = storage.buffer.as_mut_ptr();
        let allowed = storage.allowed.insert(Box::new(handles.into_array()));

        // SAFETY: `allowed` lives in the list's storage until the list is deleted.
        check(unsafe {
            UpdateProcThreadAttribute(
                list,
                0,
                PROC_THREAD_ATTRIBUTE_HANDLE_LIST as usize,
                allowed.as_slice().as_ptr().cast(),
                mem::size_of::<[HANDLE; 3]>(),
                ptr::null_mut(),
                ptr::null(),
            )
        })
    }

    fn search_path(&self, name: &OsStr, extension: &OsStr, capacity: usize) -> SearchOutcome {
        let name = to_wide(name);
        let extension = to_wide(extension);
        let capacity = capacity.min(u32::MAX as usize);
        let mut buffer = vec![0u16; capacity];

        // SAFETY: `buffer` holds `capacity` units; a null path uses the default search order.
        let len = unsafe {
            SearchPathW(
                ptr::null(),
                name.as_ptr(),
                extension.as_ptr(),
                capacity as u32,
                buffer.as_mut_ptr(),
                ptr::null_mut(),
            )
        } as usize;

        if len == 0 {
            SearchOutcome::NotFound(io::Error::last_os_error())
        } else if len >= capacity {
            SearchOutcome::Truncated { required: len }
        } else {
            buffer.truncate(len);
            SearchOutcome::Found(OsString::from_wide(&buffer))
        }
    }

    fn create_suspended(
        &self,
        command: &CommandLine,
        attributes: &AttributeList,
        stdio: StdHandles<HANDLE>,
    ) -> io::Result<ChildProcess> {
        let application = to_wide(command.application());
        let mut line = to_wide(command.line());

        // SAFETY: all-zero is a valid STARTUPINFOEXW.
        let mut startup: STARTUPINFOEXW = unsafe { mem::zeroed() };
        startup.StartupInfo.cb = mem::size_of::<STARTUPINFOEXW>() as u32;
        startup.StartupInfo.dwFlags = STARTF_USESTDHANDLES;
        startup.StartupInfo.hStdInput = stdio.input;
        startup.StartupInfo.hStdOutput = stdio.output;
        startup.StartupInfo.hStdError = stdio.error;
        startup.lpAttributeList = attributes.raw;

        // SAFETY: all-zero is a valid PROCESS_INFORMATION.
        let mut info: PROCESS_INFORMATION = unsafe { mem::zeroed() };

        // SAFETY: both strings are NUL-terminated, `line` is writable as CreateProcessW
        // requires, and the attribute list outlives the call.
        check(unsafe {
            CreateProcessW(
                application.as_ptr(),
                line.as_mut_ptr(),
                ptr::null(),
                ptr::null(),
                1, // inherit handles, filtered by the attribute list
                CREATE_SUSPENDED | CREATE_UNICODE_ENVIRONMENT | EXTENDED_STARTUPINFO_PRESENT,
                ptr::null(),
                ptr::null(),
                ptr::addr_of!(startup).cast::<STARTUPINFOW>(),
                &mut info,
            )
        })?;

        Ok(ChildProcess {
            process: close_on_drop("process", info.hProcess),
            thread: close_on_drop("thread", info.hThread),
            pid: info.dwProcessId,
        })
    }

    fn child_id(&self, child: &ChildProcess) -> u32 {
        child.pid
    }

    fn assign(&self, job: &JobObject, child: &ChildProcess) -> io::Result<()> {
        // SAFETY: both handles are open and owned by their guards.
        check(unsafe { AssignProcessToJobObject(*job.0.get(), *child.process.get()) })
    }

    fn resume(&self, child: &ChildProcess) -> io::Result<()> {
        // SAFETY: the thread handle is open and owned by its guard.
        if unsafe { ResumeThread(*child.thread.get()) } == u32::MAX {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn terminate(&self, child: &ChildProcess, exit_code: u32) -> io::Result<()> {
        // SAFETY: the process handle is open and owned by its guard.
        check(unsafe { TerminateProcess(*child.process.get(), exit_code) })
    }

    fn wait(&self, child: &ChildProcess) -> io::Result<()> {
        // SAFETY: the process handle is open and owned by its guard.
        if unsafe { WaitForSingleObject(*child.process.get(), INFINITE) } != WAIT_OBJECT_0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn exit_code(&self, child: &ChildProcess) -> io::Result<u32> {
        let mut code = 0u32;

        // SAFETY: the process handle is open and `code` is a live local.
        check(unsafe { GetExitCodeProcess(*child.process.get(), &mut code) })?;
        Ok(code)
    }
}
