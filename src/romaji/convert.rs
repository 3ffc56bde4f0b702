use super::trie::{KanaMatch, KanaTrie};

pub struct Drained {
    pub kana: String,
    pub pending: String,
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// Drain pending romaji into kana.
///
/// When `force` is false, ambiguous fragments stay pending so longer matches
/// from subsequent keystrokes remain possible (`n` could become `na`). When
/// `force` is true everything is resolved now: a trailing `n` becomes `ん`
/// and unmatchable characters are passed through as-is.
pub fn drain(kana: &str, pending: &str, force: bool) -> Drained {
    let trie = KanaTrie::global();
    let mut kana = kana.to_string();
    let mut pending = pending.to_string();

    let mut progressed = true;
    while !pending.is_empty() && progressed {
        progressed = false;
        match trie.lookup(&pending) {
            KanaMatch::Kana(out) => {
                kana.push_str(out);
                pending.clear();
                progressed = true;
            }
            KanaMatch::KanaAndPartial(out) => {
                if force {
                    kana.push_str(out);
                    pending.clear();
                    progressed = true;
                }
            }
            KanaMatch::Partial => {
                if force {
                    resolve_stuck(trie, &mut kana, &mut pending, force, &mut progressed);
                }
            }
            KanaMatch::None => {
                resolve_stuck(trie, &mut kana, &mut pending, force, &mut progressed);
            }
        }
    }

    Drained { kana, pending }
}

/// The whole of `pending` no longer matches: consume the longest matchable
/// head, or recognise sokuon/hatsuon, or (forced) pass a character through.
fn resolve_stuck(
    trie: &KanaTrie,
    kana: &mut String,
    pending: &mut String,
    force: bool,
    progressed: &mut bool,
) {
    // Longest matchable head first. KanaAndPartial is consumed here even
    // without force: the full pending already failed, so no longer match can
    // arrive for this head.
    for len in (1..pending.len()).rev() {
        if !pending.is_char_boundary(len) {
            continue;
        }
        match trie.lookup(&pending[..len]) {
            KanaMatch::Kana(out) | KanaMatch::KanaAndPartial(out) => {
                kana.push_str(out);
                *pending = pending[len..].to_string();
                *progressed = true;
                return;
            }
            _ => {}
        }
    }

    let chars: Vec<char> = pending.chars().collect();
    if chars.len() >= 2 {
        let (first, second) = (chars[0], chars[1]);
        if first == second && first != 'n' && !is_vowel(first) && first.is_ascii_alphabetic() {
            // Sokuon: doubled consonant
            kana.push('っ');
            *pending = pending.chars().skip(1).collect();
            *progressed = true;
        } else if first == 'n' && !is_vowel(second) && second != 'n' && second != 'y' {
            // Hatsuon: n before a non-vowel, non-n, non-y consonant
            kana.push('ん');
            *pending = pending.chars().skip(1).collect();
            *progressed = true;
        } else if force {
            let c = pending.remove(0);
            kana.push(c);
            *progressed = true;
        }
    } else if pending == "n" {
        if force {
            kana.push('ん');
            pending.clear();
            *progressed = true;
        }
    } else {
        // Unmatchable single character: keep it visible in the kana stream.
        kana.push_str(pending);
        pending.clear();
        *progressed = true;
    }
}
