use anyhow::Result;
use docdex::{persist, DocId, SearchConfig, SearchIndex};
use tempfile::tempdir;

const FIXTURE: &str = include_str!("data/searchindex.js");

const PROBES: &[&str] = &[
    "ndvi",
    "raster statistics",
    "tile",
    "cluster notebook",
    "spark",
    "zeppelin",
];

fn probe(index: &SearchIndex) -> Vec<Vec<(DocId, String)>> {
    let config = SearchConfig {
        limit: 100,
        ..Default::default()
    };
    PROBES
        .iter()
        .map(|q| {
            index
                .search(q, &config)
                .into_iter()
                .map(|h| (h.doc_id, h.title))
                .collect()
        })
        .collect()
}

#[test]
fn json_roundtrip_preserves_query_results() -> Result<()> {
    let index = persist::load_json_str(FIXTURE)?;
    let json = persist::to_json_string(&index)?;
    let reloaded = persist::load_json_str(&json)?;
    assert_eq!(probe(&index), probe(&reloaded));
    assert_eq!(index.len(), reloaded.len());
    for id in 0..index.len() as DocId {
        assert_eq!(index.doc(id)?, reloaded.doc(id)?);
    }
    assert_eq!(index.envversion(), reloaded.envversion());
    Ok(())
}

#[test]
fn json_file_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("searchindex.json");
    let index = persist::load_json_str(FIXTURE)?;
    persist::save_json_file(&path, &index)?;
    let reloaded = persist::load_json_file(&path)?;
    assert_eq!(probe(&index), probe(&reloaded));
    Ok(())
}

#[test]
fn snapshot_roundtrip_preserves_query_results() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("index.snapshot");
    let index = persist::load_json_str(FIXTURE)?;
    persist::save_snapshot(&path, &index)?;
    let reloaded = persist::load_snapshot(&path)?;
    assert_eq!(probe(&index), probe(&reloaded));
    assert_eq!(index.envversion(), reloaded.envversion());
    for id in 0..index.len() as DocId {
        assert_eq!(index.doc(id)?, reloaded.doc(id)?);
    }
    Ok(())
}

#[test]
fn built_index_survives_both_formats() -> Result<()> {
    let mut builder = docdex::IndexBuilder::new();
    builder.add_document(
        "guide/masking",
        "guide/masking.ipynb",
        "Tile masking",
        "Masking tiles against a quality band, then computing statistics.",
    )?;
    builder.add_document(
        "guide/ndvi",
        "guide/ndvi.ipynb",
        "Computing NDVI",
        "NDVI from the red and near-infrared bands of a raster scene.",
    )?;
    let index = builder.finish()?;

    let json = persist::to_json_string(&index)?;
    let reloaded = persist::load_json_str(&json)?;
    assert_eq!(probe(&index), probe(&reloaded));

    let dir = tempdir()?;
    let path = dir.path().join("built.snapshot");
    persist::save_snapshot(&path, &index)?;
    let snapshot = persist::load_snapshot(&path)?;
    assert_eq!(probe(&index), probe(&snapshot));
    Ok(())
}
