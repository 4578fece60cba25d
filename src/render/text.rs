// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Word-wraps `text` to `width` columns.
///
/// Paragraphs (`\n`) are kept as separate lines, runs of whitespace collapse to one space,
/// and words longer than `width` are hard-broken.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::<String>::new();

    for paragraph in text.split('\n') {
        if width == 0 {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = text_len(word);

            if word_len > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                }
                let chars = word.chars().collect::<Vec<_>>();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let chunk = chunk.iter().collect::<String>();
                    if chunks.peek().is_some() {
                        lines.push(chunk);
                    } else {
                        current_len = text_len(&chunk);
                        current = chunk;
                    }
                }
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
                current_len = word_len;
            }
        }

        lines.push(current);
    }

    lines
}

pub(crate) fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let mut lines = Vec::<String>::with_capacity(canvas.height());
    for row in canvas.rows() {
        lines.push(row.iter().collect::<String>().trim_end_matches(' ').to_owned());
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
