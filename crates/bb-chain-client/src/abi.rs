//! Calldata for the badge contract's `logBook` function.

use alloy_sol_types::{SolCall, sol};

use crate::LogBookCall;

sol! {
    function logBook(
        string title,
        string author,
        string isbn,
        string place,
        string mood,
        string timeLabel,
        string fragment,
        string photoUri,
        string coverUri,
        uint64 finishedAt
    ) returns (uint256 tokenId);
}

pub const LOG_BOOK_SIGNATURE: &str = logBookCall::SIGNATURE;

pub fn log_book_selector() -> [u8; 4] {
    logBookCall::SELECTOR
}

pub fn encode_log_book(call: &LogBookCall) -> Vec<u8> {
    logBookCall {
        title: call.title.clone(),
        author: call.author.clone(),
        isbn: call.isbn.clone(),
        place: call.place.clone(),
        mood: call.mood.clone(),
        timeLabel: call.time_label.clone(),
        fragment: call.fragment.clone(),
        photoUri: call.photo_uri.clone(),
        coverUri: call.cover_uri.clone(),
        finishedAt: call.finished_at,
    }
    .abi_encode()
}
