//! C-ABI wrapper around `post-sync-core`.
//!
//! # Overview
//! Exposes the posts API (list, update) through `extern "C"` functions so a
//! mobile or other native host with its own HTTP stack can build requests
//! and parse responses without linking to Rust's async runtime or serde.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core `PostClient` 1:1.
//! - A single `FfiPostResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `post_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use post_sync_core::{ApiError, HttpResponse, Post};

use types::*;

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `PostClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs. The caller must free the returned pointer with `post_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn post_client_new(base_url: *const c_char) -> *mut FfiPostClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { borrow_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = post_sync_core::PostClient::new(url);
        Box::into_raw(Box::new(FfiPostClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `PostClient` created by `post_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn post_client_free(client: *mut FfiPostClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for listing all posts.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `post_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn post_build_list_posts(client: *const FfiPostClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let req = client.inner.build_list_posts();
        FfiHttpRequest::from_core(req).unwrap_or(std::ptr::null_mut())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request replacing the title and body of post `id`.
///
/// Returns null if `client`, `title` or `body` is null or not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn post_build_update_post(
    client: *const FfiPostClient,
    id: u64,
    title: *const c_char,
    body: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(title), Some(body)) = (unsafe { borrow_str(title) }, unsafe { borrow_str(body) })
        else {
            return std::ptr::null_mut();
        };
        let req = client.inner.build_update_post(&Post::new(id, title, body));
        FfiHttpRequest::from_core(req).unwrap_or(std::ptr::null_mut())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is treated as empty. A body that is not UTF-8 is a `Decode`
/// error; it is never repaired.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    if resp.body.is_null() {
        return Ok(HttpResponse::new(resp.status, ""));
    }
    let body = unsafe { CStr::from_ptr(resp.body) }
        .to_str()
        .map_err(|e| ApiError::Decode(format!("response body is not UTF-8: {e}")))?;
    Ok(HttpResponse::new(resp.status, body))
}

/// Parse an HTTP response from a list-posts request.
///
/// Returns a result with `data_tag = PostList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn post_parse_list_posts(
    client: *const FfiPostClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match ffi_response_to_core(resp).and_then(|r| client.inner.parse_list_posts(r)) {
            Ok(posts) => FfiPostResult::ok_post_list(posts),
            Err(e) => FfiPostResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostResult::panic("panic in post_parse_list_posts"))
}

/// Parse an HTTP response from an update-post request.
///
/// Returns a result with `data_tag = Post` on success. The post is the
/// server's record and replaces whatever the host was holding.
#[unsafe(no_mangle)]
pub extern "C" fn post_parse_update_post(
    client: *const FfiPostClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match ffi_response_to_core(resp).and_then(|r| client.inner.parse_update_post(r)) {
            Ok(post) => FfiPostResult::ok_post(post),
            Err(e) => FfiPostResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostResult::panic("panic in post_parse_update_post"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `post_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn post_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiPostResult` returned by any `post_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn post_free_result(result: *mut FfiPostResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Post => {
                let post = unsafe { Box::from_raw(result.data as *mut FfiPost) };
                free_ffi_post_fields(&post);
            }
            FfiDataTag::PostList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiPostList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        free_ffi_post_fields(item);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free the C-string fields of an `FfiPost` (but not the struct itself).
fn free_ffi_post_fields(post: &FfiPost) {
    free_c_string(post.title);
    free_c_string(post.body);
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
