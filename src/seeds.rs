//! Built-in seed corpus.
//!
//! Guarantees the app is useful even without an external corpus file:
//! a couple of semester markers plus several well-known classical texts.

use crate::domain::{Paragraph, SourceText, SEMESTER_CATEGORY};

fn paragraphs(contents: &[&str]) -> Vec<Paragraph> {
  contents
    .iter()
    .enumerate()
    .map(|(i, content)| Paragraph { id: format!("p{}", i + 1), content: (*content).to_string() })
    .collect()
}

fn semester_marker(id: &str, title: &str) -> SourceText {
  SourceText {
    id: id.into(),
    title: title.into(),
    author: None,
    dynasty: None,
    category: SEMESTER_CATEGORY.into(),
    description: None,
    paragraphs: Vec::new(),
  }
}

/// Minimal corpus of real texts that ships with the binary.
pub fn seed_corpus() -> Vec<SourceText> {
  vec![
    semester_marker("sem-bx-shang", "必修上册"),
    semester_marker("sem-bx-xia", "必修下册"),
    SourceText {
      id: "quanxue".into(),
      title: "劝学".into(),
      author: Some("荀子".into()),
      dynasty: Some("战国".into()),
      category: "必修上册·第六单元".into(),
      description: Some("节选".into()),
      paragraphs: paragraphs(&[
        "君子曰：学不可以已。青，取之于蓝，而青于蓝；冰，水为之，而寒于水。木直中绳，輮以为轮，其曲中规。虽有槁暴，不复挺者，輮使之然也。故木受绳则直，金就砺则利，君子博学而日参省乎己，则知明而行无过矣。",
      ]),
    },
    SourceText {
      id: "ailianshuo".into(),
      title: "爱莲说".into(),
      author: Some("周敦颐".into()),
      dynasty: Some("北宋".into()),
      category: "必修上册·第三单元".into(),
      description: None,
      paragraphs: paragraphs(&[
        "水陆草木之花，可爱者甚蕃。晋陶渊明独爱菊。自李唐来，世人甚爱牡丹。予独爱莲之出淤泥而不染，濯清涟而不妖，中通外直，不蔓不枝，香远益清，亭亭净植，可远观而不可亵玩焉。",
        "予谓菊，花之隐逸者也；牡丹，花之富贵者也；莲，花之君子者也。噫！菊之爱，陶后鲜有闻。莲之爱，同予者何人？牡丹之爱，宜乎众矣。",
      ]),
    },
    SourceText {
      id: "chenqingbiao".into(),
      title: "陈情表".into(),
      author: Some("李密".into()),
      dynasty: Some("晋".into()),
      category: "必修下册·第五单元".into(),
      description: Some("第一段".into()),
      paragraphs: paragraphs(&[
        "臣密言：臣以险衅，夙遭闵凶。生孩六月，慈父见背；行年四岁，舅夺母志。祖母刘愍臣孤弱，躬亲抚养。臣少多疾病，九岁不行，零丁孤苦，至于成立。既无伯叔，终鲜兄弟，门衰祚薄，晚有儿息。外无期功强近之亲，内无应门五尺之僮，茕茕孑立，形影相吊。而刘夙婴疾病，常在床蓐，臣侍汤药，未曾废离。",
      ]),
    },
    SourceText {
      id: "chushibiao".into(),
      title: "出师表".into(),
      author: Some("诸葛亮".into()),
      dynasty: Some("蜀汉".into()),
      category: "必修下册·第五单元".into(),
      description: Some("第一段".into()),
      paragraphs: paragraphs(&[
        "先帝创业未半而中道崩殂，今天下三分，益州疲弊，此诚危急存亡之秋也。然侍卫之臣不懈于内，忠志之士忘身于外者，盖追先帝之殊遇，欲报之于陛下也。诚宜开张圣听，以光先帝遗德，恢弘志士之气，不宜妄自菲薄，引喻失义，以塞忠谏之路也。",
      ]),
    },
  ]
}
