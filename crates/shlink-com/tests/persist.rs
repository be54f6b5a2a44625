// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

// End-to-end serialization against a stand-in persistence object.
//
// `FakeLink` plays the platform shell link: its Save slot writes a link
// header, pads it with SetSize/Seek, then appends an item ID list in small
// chunks, all through the stream's dispatch table.

use std::os::raw::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use shlink::guid::{CLSID_MY_COMPUTER, CLSID_SHELL_LINK};
use shlink::{Error, ErrorKind, Guid, IdList};
use shlink_com::{
    marshal, ComStream, IPersistStream, IPersistStreamVtbl, IPersistVtbl, IStream, IUnknownVtbl,
    PersistStream, Status, HRESULT,
};

const HEADER_SIZE: usize = 0x4C;
const LINK_FLAGS: u32 = 0x83;
const WRITE_STEP: usize = 3;
#[allow(clippy::cast_possible_wrap)]
const E_ACCESSDENIED: HRESULT = 0x8007_0005_u32 as i32;

#[repr(C)]
struct FakeLink {
    vtbl: *const IPersistStreamVtbl,
    target: IdList,
    save_status: HRESULT,
    size_hint: Option<u64>,
    dirty: AtomicBool,
    loaded: Mutex<Vec<u8>>,
}

static FAKE_VTBL: IPersistStreamVtbl = IPersistStreamVtbl {
    base: IPersistVtbl {
        base: IUnknownVtbl {
            query_interface: fake_query_interface,
            add_ref: fake_add_ref,
            release: fake_release,
        },
        get_class_id: fake_get_class_id,
    },
    is_dirty: fake_is_dirty,
    load: fake_load,
    save: fake_save,
    get_size_max: fake_get_size_max,
};

impl FakeLink {
    fn new(target: IdList) -> Self {
        Self {
            vtbl: &FAKE_VTBL,
            target,
            save_status: 0,
            size_hint: None,
            dirty: AtomicBool::new(true),
            loaded: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: HRESULT) -> Self {
        Self {
            save_status: status,
            ..Self::new(IdList::new())
        }
    }

    fn persist(&self) -> PersistStream {
        let raw = (self as *const Self).cast_mut().cast::<IPersistStream>();
        unsafe { PersistStream::from_raw(raw) }.expect("non-null object")
    }

    /// What Save is expected to produce
    fn expected_bytes(&self) -> Vec<u8> {
        let mut out = header();
        out.extend_from_slice(&self.target.encode().unwrap());
        out
    }
}

fn header() -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
    let g = CLSID_SHELL_LINK;
    out.extend_from_slice(&g.data1.to_le_bytes());
    out.extend_from_slice(&g.data2.to_le_bytes());
    out.extend_from_slice(&g.data3.to_le_bytes());
    out.extend_from_slice(&g.data4);
    out.extend_from_slice(&LINK_FLAGS.to_le_bytes());
    out.resize(HEADER_SIZE, 0);
    out
}

unsafe fn link<'a>(this: *mut c_void) -> &'a FakeLink {
    &*this.cast::<FakeLink>()
}

unsafe fn stream_write(stream: *mut IStream, mut data: &[u8], step: usize) -> HRESULT {
    let v = &*(*stream).vtbl;
    while !data.is_empty() {
        let len = data.len().min(step);
        let mut n = 0u32;
        let hr = (v.base.write)(stream.cast(), data.as_ptr().cast(), len as u32, &mut n);
        if hr != 0 {
            return hr;
        }
        data = &data[n as usize..];
    }
    0
}

unsafe extern "system" fn fake_query_interface(
    _this: *mut c_void,
    _riid: *const Guid,
    _object: *mut *mut c_void,
) -> HRESULT {
    Status::NotImplemented.into()
}

unsafe extern "system" fn fake_add_ref(_this: *mut c_void) -> u32 {
    1
}

unsafe extern "system" fn fake_release(_this: *mut c_void) -> u32 {
    1
}

unsafe extern "system" fn fake_get_class_id(_this: *mut c_void, class_id: *mut Guid) -> HRESULT {
    *class_id = CLSID_SHELL_LINK;
    0
}

unsafe extern "system" fn fake_is_dirty(this: *mut c_void) -> HRESULT {
    if link(this).dirty.load(Ordering::SeqCst) {
        Status::Ok.into()
    } else {
        Status::False.into()
    }
}

unsafe extern "system" fn fake_load(this: *mut c_void, stream: *mut IStream) -> HRESULT {
    let v = &*(*stream).vtbl;
    let mut loaded = Vec::new();
    let mut chunk = [0u8; 64];
    loop {
        let mut n = 0u32;
        let hr = (v.base.read)(stream.cast(), chunk.as_mut_ptr().cast(), chunk.len() as u32, &mut n);
        if hr != 0 {
            return hr;
        }
        if n == 0 {
            break;
        }
        loaded.extend_from_slice(&chunk[..n as usize]);
    }
    *link(this).loaded.lock().unwrap() = loaded;
    0
}

unsafe extern "system" fn fake_save(this: *mut c_void, stream: *mut IStream, clear_dirty: i32) -> HRESULT {
    let link = link(this);
    if link.save_status != 0 {
        return link.save_status;
    }
    let v = &*(*stream).vtbl;

    // Fixed part of the header, then reserve the rest of it
    let head = header();
    let hr = stream_write(stream, &head[..24], 8);
    if hr != 0 {
        return hr;
    }
    let hr = (v.set_size)(stream.cast(), HEADER_SIZE as u64);
    if hr != 0 {
        return hr;
    }
    let mut pos = 0u64;
    let hr = (v.seek)(stream.cast(), 0, 2, &mut pos);
    if hr != 0 || pos != HEADER_SIZE as u64 {
        return Status::Fail.into();
    }

    let fragment = match link.target.encode() {
        Ok(bytes) => bytes,
        Err(_) => return Status::InvalidArgument.into(),
    };
    let hr = stream_write(stream, &fragment, WRITE_STEP);
    if hr != 0 {
        return hr;
    }

    if clear_dirty != 0 {
        link.dirty.store(false, Ordering::SeqCst);
    }
    0
}

unsafe extern "system" fn fake_get_size_max(this: *mut c_void, size: *mut u64) -> HRESULT {
    let link = link(this);
    *size = link
        .size_hint
        .unwrap_or((HEADER_SIZE + link.target.size()) as u64);
    0
}

fn sample_target() -> IdList {
    // Root folder item, then path components
    let g = CLSID_MY_COMPUTER;
    let mut root = vec![0x1F, 0x50];
    root.extend_from_slice(&g.data1.to_le_bytes());
    root.extend_from_slice(&g.data2.to_le_bytes());
    root.extend_from_slice(&g.data3.to_le_bytes());
    root.extend_from_slice(&g.data4);
    [root, b"/C:\\".to_vec(), b"Users".to_vec()]
        .into_iter()
        .collect()
}

#[test]
fn test_marshal_collects_everything_saved() {
    let fake = FakeLink::new(sample_target());
    let persist = fake.persist();

    let bytes = marshal(&persist).expect("marshal");
    assert_eq!(bytes, fake.expected_bytes());

    // Link header prefix: size, class ID, flags
    let prefix: Vec<u8> = vec![
        0x4c, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x46, 0x83, 0x00, 0x00, 0x00,
    ];
    assert_eq!(&bytes[..24], prefix.as_slice());

    let (decoded, used) = IdList::decode(&bytes[HEADER_SIZE..]).expect("decode");
    assert_eq!(decoded, sample_target());
    assert_eq!(HEADER_SIZE + used, bytes.len());
}

#[test]
fn test_marshal_clears_dirty() {
    let fake = FakeLink::new(IdList::new());
    let persist = fake.persist();

    assert!(persist.is_dirty().unwrap());
    marshal(&persist).unwrap();
    assert!(!persist.is_dirty().unwrap());
}

#[test]
fn test_metadata_slots() {
    let fake = FakeLink::new(sample_target());
    let persist = fake.persist();

    assert_eq!(persist.class_id().unwrap(), CLSID_SHELL_LINK);
    assert_eq!(
        persist.size_max().unwrap(),
        (HEADER_SIZE + sample_target().size()) as u64
    );
}

#[test]
fn test_oversized_size_hint_is_only_a_hint() {
    for hint in [200_000, u64::MAX] {
        let fake = FakeLink {
            size_hint: Some(hint),
            ..FakeLink::new(sample_target())
        };
        let persist = fake.persist();

        assert_eq!(persist.size_max().unwrap(), hint);
        assert_eq!(marshal(&persist).unwrap(), fake.expected_bytes());
    }
}

#[test]
fn test_failed_save_is_wrapped() {
    let fake = FakeLink::failing(E_ACCESSDENIED);
    let persist = fake.persist();

    let err = marshal(&persist).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::External);
    match &err {
        Error::External { context, status } => {
            assert_eq!(*status, E_ACCESSDENIED);
            assert!(context.contains("IPersistStream::Save"), "{context}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(shlink_com::hresult_of(&err), E_ACCESSDENIED);
    assert!(persist.is_dirty().unwrap());
}

#[test]
fn test_save_into_caller_stream_at_cursor() {
    let fake = FakeLink::new(IdList::new());
    let persist = fake.persist();

    let stream = ComStream::new();
    stream.buffer().write(b"prefix").unwrap();
    persist.save(&stream, false).unwrap();

    let bytes = stream.snapshot();
    assert_eq!(&bytes[..6], b"prefix");
    // Header lands at the cursor; SetSize pads relative to the stream start
    assert_eq!(&bytes[6..30], &header()[..24]);
    assert_eq!(bytes.len(), HEADER_SIZE + 4);
    assert!(persist.is_dirty().unwrap());
}

#[test]
fn test_load_reads_from_cursor() {
    let fake = FakeLink::new(IdList::new());
    let persist = fake.persist();

    let stream = ComStream::new();
    stream.buffer().write(b"skip:payload").unwrap();
    stream.buffer().seek(5, shlink::SeekOrigin::Start).unwrap();

    persist.load(&stream).unwrap();
    assert_eq!(*fake.loaded.lock().unwrap(), b"payload");
}

#[test]
fn test_null_object_rejected() {
    assert!(unsafe { PersistStream::from_raw(ptr::null_mut()) }.is_none());

    let mut orphan = IPersistStream { vtbl: ptr::null() };
    assert!(unsafe { PersistStream::from_raw(&mut orphan) }.is_none());
}
