use chrono::NaiveDate;
use entrybook::db::pool::DbPool;
use entrybook::db::queries::Mutation;
use entrybook::models::entry::EntryData;
use entrybook::models::page::PageQuery;
use entrybook::models::reference::ReferenceKind;
use entrybook::models::sort::{SortColumn, SortOrder};
use entrybook::store::{EntryRepository, ReferenceRepository};
use std::sync::Arc;
use tempfile::TempDir;

async fn repos() -> (TempDir, EntryRepository, ReferenceRepository) {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(DbPool::open(dir.path().join("repo.sqlite"), 4, 32).unwrap());
    let entries = EntryRepository::new(Arc::clone(&pool)).await.unwrap();
    let references = ReferenceRepository::new(pool);
    (dir, entries, references)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[tokio::test]
async fn test_create_then_lookup() {
    let (_dir, entries, references) = repos().await;
    let apple = references.add(ReferenceKind::Vendor, "Apple Inc.").await.unwrap();

    let data = EntryData {
        start_date: date(1984, 1, 24),
        vendor_id: Some(apple),
        ..EntryData::named("Macintosh")
    };
    let id = entries.insert(data).await.unwrap();

    let found = entries.lookup(id).await.unwrap().expect("entry stored");
    assert_eq!(found.id, id);
    assert_eq!(found.name, "Macintosh");
    assert_eq!(found.start_date_str(), "1984-01-24");
    assert_eq!(found.end_date_str(), "");
    assert_eq!(found.vendor_name(), "Apple Inc.");
    assert!(found.department.is_none());
}

#[tokio::test]
async fn test_update_keeps_id_and_replaces_fields() {
    let (_dir, entries, _) = repos().await;
    let id = entries.insert(EntryData::named("ACE")).await.unwrap();

    let data = EntryData {
        start_date: date(1950, 5, 10),
        end_date: date(1955, 1, 1),
        ..EntryData::named("Pilot ACE")
    };
    assert_eq!(entries.update(id, data).await.unwrap(), Mutation::Applied(id));

    let found = entries.lookup(id).await.unwrap().unwrap();
    assert_eq!(found.name, "Pilot ACE");
    assert_eq!(found.end_date_str(), "1955-01-01");

    let page = entries.page(PageQuery::new(0, 10)).await.unwrap();
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn test_missing_rows_report_not_found() {
    let (_dir, entries, _) = repos().await;

    assert!(entries.lookup(42).await.unwrap().is_none());
    assert_eq!(
        entries.update(42, EntryData::named("Ghost")).await.unwrap(),
        Mutation::NotFound
    );
    assert_eq!(entries.delete(42).await.unwrap(), Mutation::NotFound);
}

#[tokio::test]
async fn test_delete_removes_entry() {
    let (_dir, entries, _) = repos().await;
    let id = entries.insert(EntryData::named("Amiga")).await.unwrap();

    assert_eq!(entries.delete(id).await.unwrap(), Mutation::Applied(id));
    assert!(entries.lookup(id).await.unwrap().is_none());
    assert_eq!(entries.delete(id).await.unwrap(), Mutation::NotFound);
}

#[tokio::test]
async fn test_filter_is_case_insensitive_substring() {
    let (_dir, entries, _) = repos().await;
    for name in ["Macintosh", "MacBook Pro", "Amiga", "iMac"] {
        entries.insert(EntryData::named(name)).await.unwrap();
    }

    let page = entries
        .page(PageQuery::new(0, 10).filtered("mac"))
        .await
        .unwrap();
    assert_eq!(page.total_count, 3);
    let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["iMac", "MacBook Pro", "Macintosh"]);

    let none = entries
        .page(PageQuery::new(0, 10).filtered("100%"))
        .await
        .unwrap();
    assert_eq!(none.total_count, 0);
}

#[tokio::test]
async fn test_filter_ignores_case_beyond_ascii() {
    let (_dir, entries, _) = repos().await;
    entries.insert(EntryData::named("ÉCLAIR Ökonom")).await.unwrap();
    entries.insert(EntryData::named("Amiga")).await.unwrap();

    for filter in ["éclair", "ökonom", "ÖKONOM"] {
        let page = entries
            .page(PageQuery::new(0, 10).filtered(filter))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "filter {filter}");
        assert_eq!(page.items[0].name, "ÉCLAIR Ökonom");
    }
}

#[tokio::test]
async fn test_paging_over_many_entries() {
    let (_dir, entries, _) = repos().await;
    for i in 0..574 {
        entries
            .insert(EntryData::named(format!("Computer {i:03}")))
            .await
            .unwrap();
    }

    let page = entries.page(PageQuery::new(1, 20)).await.unwrap();
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.total_count, 574);
    assert_eq!(page.total_page_count(), 29);
    assert_eq!(page.items[0].name, "Computer 020");
    assert_eq!(page.display_from(), 21);
    assert_eq!(page.display_to(), 40);

    let last = entries.page(PageQuery::new(28, 20)).await.unwrap();
    assert_eq!(last.items.len(), 14);
    assert!(!last.has_next());

    let beyond = entries.page(PageQuery::new(99, 20)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, 574);

    let desc = entries
        .page(PageQuery::new(0, 10).sorted(SortColumn::Name, SortOrder::Desc))
        .await
        .unwrap();
    assert_eq!(desc.items.len(), 10);
    assert_eq!(desc.items[0].name, "Computer 573");
}

#[tokio::test]
async fn test_sort_by_vendor_puts_unlinked_first() {
    let (_dir, entries, references) = repos().await;
    let ibm = references.add(ReferenceKind::Vendor, "IBM").await.unwrap();
    let apple = references.add(ReferenceKind::Vendor, "Apple Inc.").await.unwrap();

    entries
        .insert(EntryData { vendor_id: Some(ibm), ..EntryData::named("PC") })
        .await
        .unwrap();
    entries
        .insert(EntryData { vendor_id: Some(apple), ..EntryData::named("Lisa") })
        .await
        .unwrap();
    entries.insert(EntryData::named("Homebrew")).await.unwrap();

    let page = entries
        .page(PageQuery::new(0, 10).sorted(SortColumn::Vendor, SortOrder::Asc))
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Homebrew", "Lisa", "PC"]);
}

#[tokio::test]
async fn test_ids_increase_across_inserts() {
    let (_dir, entries, _) = repos().await;
    let mut last = 0;
    for i in 0..20 {
        let id = entries.insert(EntryData::named(format!("E{i}"))).await.unwrap();
        assert!(id > last);
        last = id;
    }
}

#[tokio::test]
async fn test_reference_options_are_ordered_by_name() {
    let (_dir, _, references) = repos().await;
    references.add(ReferenceKind::Department, "Sales").await.unwrap();
    references.add(ReferenceKind::Department, "Engineering").await.unwrap();

    let options = references.options(ReferenceKind::Department).await.unwrap();
    let names: Vec<_> = options.iter().map(|(_, name)| name).collect();
    assert_eq!(names, ["Engineering", "Sales"]);
    assert!(references.options(ReferenceKind::Vendor).await.unwrap().is_empty());
}
