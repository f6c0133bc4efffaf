//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices handed out as pointer plus
//! length instead of `Vec`, and tagged enums with explicit discriminants.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.
//!
//! Conversions build every `CString` before leaking any pointer, so a string
//! with an interior NUL fails the whole conversion without leaking.

use std::ffi::{c_void, CString, NulError};
use std::os::raw::c_char;

use post_sync_core::{ApiError, HttpMethod, HttpRequest, Post};

/// Opaque handle to a `PostClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiPostClient {
    pub(crate) inner: post_sync_core::PostClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Put = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `post_build_*` functions. The C caller executes the request
/// and passes the response back through `post_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> Result<*mut Self, NulError> {
        let path = CString::new(req.path)?;
        let body = req.body.map(CString::new).transpose()?;
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| -> Result<_, NulError> { Ok((CString::new(k)?, CString::new(v)?)) })
            .collect::<Result<Vec<_>, NulError>>()?;

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(key, value)| FfiHeader {
                    key: key.into_raw(),
                    value: value.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Ok(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: path.into_raw(),
            headers,
            headers_len,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
        })))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `post_parse_*` function. The FFI layer reads
/// but does not free these fields. A null `body` is an empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPostResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Remote = 2,
    Decode = 3,
    Panic = 4,
    NullArg = 5,
}

/// Tag that tells `post_free_result` what `FfiPostResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Post = 1,
    PostList = 2,
}

/// A single post exposed to C.
#[repr(C)]
pub struct FfiPost {
    pub id: u64,
    pub title: *mut c_char,
    pub body: *mut c_char,
}

/// A list of posts exposed to C, in server order.
#[repr(C)]
pub struct FfiPostList {
    pub items: *mut FfiPost,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `data` is null, and `http_status` carries the
/// server status for `Remote` errors (0 otherwise).
#[repr(C)]
pub struct FfiPostResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

/// Owned C strings for one post, not yet handed to C.
struct PostStrings {
    id: u64,
    title: CString,
    body: CString,
}

impl PostStrings {
    fn new(post: Post) -> Result<Self, NulError> {
        Ok(Self {
            id: post.id,
            title: CString::new(post.title)?,
            body: CString::new(post.body)?,
        })
    }

    fn into_ffi(self) -> FfiPost {
        FfiPost {
            id: self.id,
            title: self.title.into_raw(),
            body: self.body.into_raw(),
        }
    }
}

impl FfiPostResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiPostResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiPostResult {
            error_code,
            error_message: CString::new(msg).unwrap_or_default().into_raw(),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a single `FfiPost`.
    pub(crate) fn ok_post(post: Post) -> *mut Self {
        match PostStrings::new(post) {
            Ok(strings) => {
                let ffi_post = Box::new(strings.into_ffi());
                Self::ok(FfiDataTag::Post, Box::into_raw(ffi_post) as *mut c_void)
            }
            Err(e) => Self::nul_in_payload(e),
        }
    }

    /// Build a success result carrying a `FfiPostList`.
    pub(crate) fn ok_post_list(posts: Vec<Post>) -> *mut Self {
        let strings = match posts
            .into_iter()
            .map(PostStrings::new)
            .collect::<Result<Vec<_>, NulError>>()
        {
            Ok(strings) => strings,
            Err(e) => return Self::nul_in_payload(e),
        };

        let len = strings.len() as u32;
        let items = if strings.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_posts: Box<[FfiPost]> = strings.into_iter().map(PostStrings::into_ffi).collect();
            Box::into_raw(ffi_posts) as *mut FfiPost
        };

        let ffi_list = Box::new(FfiPostList { items, len });
        Self::ok(FfiDataTag::PostList, Box::into_raw(ffi_list) as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Remote { status, .. } => (FfiErrorCode::Remote, *status),
            ApiError::Decode(_) => (FfiErrorCode::Decode, 0),
        };
        Self::error(error_code, http_status, err.to_string())
    }

    /// A decoded string cannot be represented as a C string.
    fn nul_in_payload(err: NulError) -> *mut Self {
        Self::error(
            FfiErrorCode::Decode,
            0,
            format!("decode failed: string contains NUL at byte {}", err.nul_position()),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
