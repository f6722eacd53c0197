//! Decoding list entries into [`Item`]s.
//!
//! Each entry is an object with a single renderer key (`videoRenderer`, `playlistRenderer`,
//! ...). The key decides how the rest is read. Every field is optional: a renderer missing its
//! title still decodes, just with an empty title.

use super::text::{number, parse_count, parse_duration, text};
use super::types::{Author, Item, ItemKind, Thumbnail};
use crate::config::YOUTUBE_BASE_URL;
use serde_json::Value;

pub(crate) const VIDEO_URL: &str = "https://www.youtube.com/watch?v=";
pub(crate) const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renderer {
    Video,
    Playlist,
    GridPlaylist,
    Lockup,
}

/// Exact renderer keys in the order they are tried.
const PRIORITY: [(&str, Renderer); 5] = [
    ("videoRenderer", Renderer::Video),
    ("gridVideoRenderer", Renderer::Video),
    ("playlistRenderer", Renderer::Playlist),
    ("gridPlaylistRenderer", Renderer::GridPlaylist),
    ("lockupViewModel", Renderer::Lockup),
];

/// Decodes one raw list entry. Channels, shelves, continuation markers and anything
/// unrecognized give `None`.
pub fn decode_item(entry: &Value) -> Option<Item> {
    let map = entry.as_object()?;
    let (renderer, kind) = PRIORITY
        .iter()
        .find_map(|(key, kind)| map.get(*key).map(|r| (r, *kind)))
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.contains("VideoRenderer"))
                .map(|(_, r)| (r, Renderer::Video))
        })?;

    match kind {
        Renderer::Video => decode_video(renderer),
        Renderer::Playlist | Renderer::GridPlaylist => decode_playlist(renderer),
        Renderer::Lockup => decode_lockup(renderer),
    }
}

/// Decodes `entries` in order, keeping only items of `kind` when given.
pub fn decode_items<'a>(
    entries: impl IntoIterator<Item = &'a Value>,
    kind: Option<ItemKind>,
) -> Vec<Item> {
    entries
        .into_iter()
        .filter_map(decode_item)
        .filter(|item| kind.is_none_or(|k| item.kind == k))
        .collect()
}

/// Starts an item from its ID field. A missing ID leaves both the ID and the URL empty.
fn identified(kind: ItemKind, id: Option<&Value>) -> Item {
    let id = id.and_then(Value::as_str).unwrap_or_default();
    let url = match (id.is_empty(), kind) {
        (true, _) => String::new(),
        (false, ItemKind::Video) => format!("{VIDEO_URL}{id}"),
        (false, ItemKind::Playlist) => format!("{PLAYLIST_URL}{id}"),
    };
    Item::new(kind, id.to_string(), url)
}

fn decode_video(r: &Value) -> Option<Item> {
    let mut item = identified(ItemKind::Video, r.get("videoId"));

    item.title = text(r.get("title"));
    item.thumbnails = thumbnails(r.pointer("/thumbnail/thumbnails"));
    item.best_thumbnail = item.thumbnails.first().cloned();
    item.description = description(r);
    item.duration = text(r.get("lengthText"));
    item.length_seconds = r
        .get("lengthSeconds")
        .and_then(|v| v.as_str().and_then(|s| s.parse().ok()).or_else(|| v.as_u64()))
        .or_else(|| parse_duration(&item.duration));
    item.published = text(r.get("publishedTimeText"));
    item.index = r
        .get("index")
        .map(|v| parse_count(&text(Some(v))))
        .filter(|i| *i > 0);
    item.is_playable = r.get("isPlayable").and_then(Value::as_bool).unwrap_or(true);

    let views = number(r.get("viewCountText"));
    item.views = (views > 0).then_some(views);

    item.badges = badge_labels(r.get("badges"));
    item.is_live = item.badges.iter().any(|b| b == "LIVE" || b == "LIVE NOW")
        || overlay_style(r).is_some_and(|s| s == "LIVE");

    if let Some(upcoming) = r.get("upcomingEventData") {
        item.is_upcoming = true;
        item.is_premiere = text(upcoming.get("upcomingEventText")).contains("Premier");
    }

    item.author = author(r, false);
    Some(item)
}

fn decode_playlist(r: &Value) -> Option<Item> {
    let mut item = identified(ItemKind::Playlist, r.get("playlistId"));

    item.title = text(r.get("title"));
    item.thumbnails = thumbnails(
        r.pointer("/thumbnails/0/thumbnails")
            .or_else(|| r.pointer("/thumbnail/thumbnails")),
    );
    item.best_thumbnail = item.thumbnails.first().cloned();
    item.published = text(r.get("publishedTimeText"));
    item.video_count = r
        .get("videoCount")
        .and_then(Value::as_str)
        .map(parse_count)
        .or_else(|| r.get("videoCountText").map(|v| number(Some(v))));
    item.author = author(r, true);
    Some(item)
}

fn decode_lockup(r: &Value) -> Option<Item> {
    if r.get("contentType").and_then(Value::as_str) != Some("LOCKUP_CONTENT_TYPE_PLAYLIST") {
        return None;
    }
    let mut item = identified(ItemKind::Playlist, r.get("contentId"));
    item.title = text(r.pointer("/metadata/lockupMetadataViewModel/title"));
    item.thumbnails = thumbnails(r.pointer(
        "/contentImage/collectionThumbnailViewModel/primaryThumbnail/thumbnailViewModel/image/sources",
    ));
    item.best_thumbnail = item.thumbnails.first().cloned();
    Some(item)
}

fn description(r: &Value) -> String {
    [
        r.get("descriptionSnippet"),
        r.pointer("/detailedMetadataSnippets/0/snippetText"),
        r.pointer("/richSnippet/snippetText"),
    ]
    .into_iter()
    .flatten()
    .next()
    .map(|node| text(Some(node)))
    .unwrap_or_default()
}

fn overlay_style(r: &Value) -> Option<&str> {
    r.get("thumbnailOverlays")?
        .as_array()?
        .iter()
        .find_map(|o| o.pointer("/thumbnailOverlayTimeStatusRenderer/style")?.as_str())
}

fn badge_labels(badges: Option<&Value>) -> Vec<String> {
    badge_renderers(badges)
        .filter_map(|b| b.get("label").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn badge_renderers(badges: Option<&Value>) -> impl Iterator<Item = &Value> {
    badges
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|b| b.get("metadataBadgeRenderer"))
}

/// Reads the owner run of a renderer. Playlist owners also count artist badges as
/// verification.
fn author(r: &Value, playlist_owner: bool) -> Option<Author> {
    let run = ["ownerText", "shortBylineText", "longBylineText"]
        .iter()
        .find_map(|key| r.get(*key)?.pointer("/runs/0"))?;

    let mut author = channel_run(run);
    author.avatars = thumbnails(r.pointer(
        "/channelThumbnailSupportedRenderers/channelThumbnailWithLinkRenderer/thumbnail/thumbnails",
    ));
    author.best_avatar = author.avatars.first().cloned();
    apply_owner_badges(&mut author, r.get("ownerBadges"), playlist_owner);
    Some(author)
}

/// Reads a playlist sidebar `videoOwnerRenderer`.
pub(crate) fn video_owner(r: &Value) -> Option<Author> {
    let run = r.pointer("/title/runs/0")?;
    let mut author = channel_run(run);
    author.avatars = thumbnails(r.pointer("/thumbnail/thumbnails"));
    author.best_avatar = author.avatars.first().cloned();
    apply_owner_badges(&mut author, r.get("badges"), true);
    Some(author)
}

/// Name, channel ID and channel URL from a text run linking to a channel.
fn channel_run(run: &Value) -> Author {
    let mut author = Author {
        name: run
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ..Author::default()
    };

    if let Some(browse) = run.pointer("/navigationEndpoint/browseEndpoint") {
        author.channel_id = browse
            .get("browseId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if let Some(url) = browse
            .get("canonicalBaseUrl")
            .and_then(Value::as_str)
            .and_then(|path| YOUTUBE_BASE_URL.join(path).ok())
        {
            author.url = url.to_string();
        }
    }
    author
}

fn apply_owner_badges(author: &mut Author, badges: Option<&Value>, playlist_owner: bool) {
    for badge in badge_renderers(badges) {
        if let Some(tooltip) = badge.get("tooltip").and_then(Value::as_str) {
            author.badges.push(tooltip.to_string());
            let upper = tooltip.to_uppercase();
            if upper.contains("VERIFIED")
                || upper.contains("OFFICIAL")
                || (playlist_owner && upper.contains("ARTIST"))
            {
                author.verified = true;
            }
        }
        if playlist_owner
            && matches!(
                badge.get("style").and_then(Value::as_str),
                Some("BADGE_STYLE_TYPE_VERIFIED" | "BADGE_STYLE_TYPE_VERIFIED_ARTIST")
            )
        {
            author.verified = true;
        }
    }
}

/// Reads a thumbnail list, resolving relative URLs and ordering by descending width.
pub(crate) fn thumbnails(node: Option<&Value>) -> Vec<Thumbnail> {
    let mut thumbs: Vec<Thumbnail> = node
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|t| {
            let url = t.get("url")?.as_str()?;
            let url = YOUTUBE_BASE_URL
                .join(url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| url.to_string());
            Some(Thumbnail {
                url,
                width: t.get("width").and_then(Value::as_u64).unwrap_or(0),
                height: t.get("height").and_then(Value::as_u64).unwrap_or(0),
            })
        })
        .collect();
    thumbs.sort_by(|a, b| b.width.cmp(&a.width));
    thumbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn video_entry() -> Value {
        json!({"videoRenderer": {
            "videoId": "dQw4w9WgXcQ",
            "title": {"runs": [{"text": "Never Gonna "}, {"text": "Give You Up"}]},
            "thumbnail": {"thumbnails": [
                {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "width": 120, "height": 90},
                {"url": "//i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg", "width": 480, "height": 360}
            ]},
            "detailedMetadataSnippets": [{"snippetText": {"runs": [{"text": "The official video"}]}}],
            "viewCountText": {"simpleText": "1,234,567 views"},
            "lengthText": {"simpleText": "3:33"},
            "publishedTimeText": {"simpleText": "14 years ago"},
            "ownerText": {"runs": [{
                "text": "Rick Astley",
                "navigationEndpoint": {"browseEndpoint": {
                    "browseId": "UCuAXFkgsw1L7xaCfnd5JJOw",
                    "canonicalBaseUrl": "/@RickAstleyYT"
                }}
            }]},
            "ownerBadges": [{"metadataBadgeRenderer": {"tooltip": "Official Artist Channel"}}],
            "channelThumbnailSupportedRenderers": {"channelThumbnailWithLinkRenderer": {
                "thumbnail": {"thumbnails": [{"url": "https://yt3.ggpht.com/a.jpg", "width": 68, "height": 68}]}
            }},
            "badges": [{"metadataBadgeRenderer": {"label": "4K"}}]
        }})
    }

    #[test]
    fn decodes_video_fields() {
        let item = decode_item(&video_entry()).unwrap();
        assert_eq!(item.kind, ItemKind::Video);
        assert_eq!(item.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(item.title, "Never Gonna Give You Up");
        assert_eq!(item.description, "The official video");
        assert_eq!(item.views, Some(1_234_567));
        assert_eq!(item.duration, "3:33");
        assert_eq!(item.length_seconds, Some(213));
        assert_eq!(item.published, "14 years ago");
        assert_eq!(item.badges, vec!["4K".to_string()]);
        assert!(!item.is_live);

        let best = item.best_thumbnail.unwrap();
        assert_eq!(best.width, 480);
        assert_eq!(best.url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg");

        let author = item.author.unwrap();
        assert_eq!(author.name, "Rick Astley");
        assert_eq!(author.channel_id, "UCuAXFkgsw1L7xaCfnd5JJOw");
        assert_eq!(author.url, "https://www.youtube.com/@RickAstleyYT");
        assert!(author.verified);
        assert_eq!(author.best_avatar.map(|a| a.width), Some(68));
    }

    #[test]
    fn description_prefers_snippet() {
        let entry = json!({"videoRenderer": {
            "videoId": "x",
            "descriptionSnippet": {"simpleText": "first"},
            "detailedMetadataSnippets": [{"snippetText": {"simpleText": "second"}}],
            "richSnippet": {"snippetText": {"simpleText": "third"}}
        }});
        assert_eq!(decode_item(&entry).unwrap().description, "first");

        let entry = json!({"videoRenderer": {
            "videoId": "x",
            "richSnippet": {"snippetText": {"simpleText": "third"}}
        }});
        assert_eq!(decode_item(&entry).unwrap().description, "third");
    }

    #[test]
    fn live_badges_and_zero_views() {
        let entry = json!({"videoRenderer": {
            "videoId": "live1",
            "viewCountText": {"runs": [{"text": "No"}, {"text": " watching"}]},
            "badges": [{"metadataBadgeRenderer": {"label": "LIVE"}}]
        }});
        let item = decode_item(&entry).unwrap();
        assert!(item.is_live);
        assert_eq!(item.views, None);
    }

    #[test]
    fn video_wins_over_channel() {
        let entry = json!({
            "channelRenderer": {"channelId": "UCxyz"},
            "videoRenderer": {"videoId": "abc"}
        });
        assert_eq!(decode_item(&entry).map(|i| i.kind), Some(ItemKind::Video));
        assert_eq!(decode_item(&json!({"channelRenderer": {"channelId": "UCxyz"}})), None);
        assert_eq!(decode_item(&json!({"shelfRenderer": {}})), None);
        assert_eq!(decode_item(&json!("not an object")), None);
    }

    #[test]
    fn playlist_video_renderer_extras() {
        let entry = json!({"playlistVideoRenderer": {
            "videoId": "pv1",
            "index": {"simpleText": "7"},
            "lengthSeconds": "253",
            "lengthText": {"simpleText": "4:13"},
            "isPlayable": false,
            "shortBylineText": {"runs": [{"text": "Uploader"}]},
            "upcomingEventData": {"startTime": "1700000000", "upcomingEventText": {"runs": [{"text": "Premieres "}, {"text": "DATE_PLACEHOLDER"}]}},
            "thumbnailOverlays": [{"thumbnailOverlayTimeStatusRenderer": {"style": "UPCOMING"}}]
        }});
        let item = decode_item(&entry).unwrap();
        assert_eq!(item.index, Some(7));
        assert_eq!(item.length_seconds, Some(253));
        assert!(!item.is_playable);
        assert!(item.is_upcoming);
        assert!(item.is_premiere);
        assert!(!item.is_live);
        assert_eq!(item.author.unwrap().name, "Uploader");
    }

    #[test]
    fn playlist_owner_artist_is_verified() {
        let entry = json!({"playlistRenderer": {
            "playlistId": "PLpas7-jjCh0Z7-t9yqhg3ibXTgeZhtH-G",
            "title": {"simpleText": "Mix tape"},
            "videoCount": "42",
            "thumbnails": [{"thumbnails": [{"url": "https://i.ytimg.com/p.jpg", "width": 336, "height": 188}]}],
            "shortBylineText": {"runs": [{"text": "Someone"}]},
            "ownerBadges": [{"metadataBadgeRenderer": {"style": "BADGE_STYLE_TYPE_VERIFIED_ARTIST"}}]
        }});
        let item = decode_item(&entry).unwrap();
        assert_eq!(item.kind, ItemKind::Playlist);
        assert_eq!(
            item.url,
            "https://www.youtube.com/playlist?list=PLpas7-jjCh0Z7-t9yqhg3ibXTgeZhtH-G"
        );
        assert_eq!(item.video_count, Some(42));
        assert_eq!(item.thumbnails.len(), 1);
        assert!(item.author.unwrap().verified);
    }

    #[test]
    fn lockup_only_decodes_playlists() {
        let playlist = json!({"lockupViewModel": {
            "contentType": "LOCKUP_CONTENT_TYPE_PLAYLIST",
            "contentId": "PLlockup",
            "metadata": {"lockupMetadataViewModel": {"title": {"content": "Lockup list"}}}
        }});
        let item = decode_item(&playlist).unwrap();
        assert_eq!(item.id, "PLlockup");
        assert_eq!(item.title, "Lockup list");

        let video = json!({"lockupViewModel": {
            "contentType": "LOCKUP_CONTENT_TYPE_VIDEO",
            "contentId": "vid"
        }});
        assert_eq!(decode_item(&video), None);
    }

    #[test]
    fn missing_id_still_decodes() {
        let video = decode_item(&json!({"videoRenderer": {"title": {"simpleText": "t"}}})).unwrap();
        assert_eq!(video.kind, ItemKind::Video);
        assert_eq!(video.title, "t");
        assert_eq!(video.id, "");
        assert_eq!(video.url, "");

        let playlist = decode_item(&json!({"playlistRenderer": {
            "title": {"simpleText": "untitled list"},
            "videoCount": "3"
        }}))
        .unwrap();
        assert_eq!(playlist.kind, ItemKind::Playlist);
        assert_eq!(playlist.id, "");
        assert_eq!(playlist.url, "");
        assert_eq!(playlist.video_count, Some(3));

        let lockup = decode_item(&json!({"lockupViewModel": {
            "contentType": "LOCKUP_CONTENT_TYPE_PLAYLIST"
        }}))
        .unwrap();
        assert_eq!(lockup.id, "");
    }

    #[test]
    fn kind_filter_keeps_order() {
        let entries = vec![
            json!({"videoRenderer": {"videoId": "a"}}),
            json!({"playlistRenderer": {"playlistId": "PLb"}}),
            json!({"continuationItemRenderer": {}}),
            json!({"videoRenderer": {"videoId": "c"}}),
        ];
        let ids: Vec<_> = decode_items(&entries, Some(ItemKind::Video))
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(decode_items(&entries, None).len(), 3);
    }
}
