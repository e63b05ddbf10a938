//! Bundled demo catalog: three short stories in the current lesson schema, used by the dataset
//! and integration tests. Each lesson's pinyin has one syllable per hanzi, in story order.

use crate::error::LoadError;
use crate::lesson::Catalog;

pub const DEMO_CATALOG_JSON: &str = r#"[
  {
    "id": "Group_1",
    "title": "小猫找鱼",
    "heroName": "咪咪",
    "storyText": "小猫咪咪饿了。它去河边找鱼，看见一条大鱼！咪咪说：“鱼，你好！”",
    "pinyinText": "xiǎo māo mī mī è le tā qù hé biān zhǎo yú kàn jiàn yì tiáo dà yú mī mī shuō yú nǐ hǎo",
    "vocabulary": [
      { "surfaceForm": "小猫", "pinyin": "xiǎo māo", "definition": "kitten" },
      { "surfaceForm": "河边", "pinyin": "hé biān", "definition": "riverside" },
      { "surfaceForm": "看见", "pinyin": "kàn jiàn", "definition": "to see" },
      { "surfaceForm": "你好", "pinyin": "nǐ hǎo", "definition": "hello" }
    ],
    "seekCharacters": ["鱼", "猫"],
    "imageRef": "images/group_1.png"
  },
  {
    "id": "Group_2",
    "title": "爬大山",
    "heroName": "小明",
    "storyText": "小明和爸爸去爬山。山很高，水很清。爸爸说：“上山慢慢走。”",
    "pinyinText": "xiǎo míng hé bà ba qù pá shān shān hěn gāo shuǐ hěn qīng bà ba shuō shàng shān màn màn zǒu",
    "vocabulary": [
      { "surfaceForm": "爸爸", "pinyin": "bà ba", "definition": "dad" },
      { "surfaceForm": "爬山", "pinyin": "pá shān", "definition": "to climb a mountain" },
      { "surfaceForm": "慢慢", "pinyin": "màn màn", "definition": "slowly" }
    ],
    "seekCharacters": ["山", "水"],
    "imageRef": "images/group_2.png"
  },
  {
    "id": "Group_3",
    "title": "月亮晚安",
    "heroName": "兔兔",
    "storyText": "晚上，月亮出来了。兔兔看月亮，月亮也看兔兔。兔兔说：“月亮，晚安！”",
    "pinyinText": "wǎn shang yuè liang chū lái le tù tu kàn yuè liang yuè liang yě kàn tù tu tù tu shuō yuè liang wǎn ān",
    "vocabulary": [
      { "surfaceForm": "晚上", "pinyin": "wǎn shang", "definition": "evening" },
      { "surfaceForm": "月亮", "pinyin": "yuè liang", "definition": "moon" },
      { "surfaceForm": "晚安", "pinyin": "wǎn ān", "definition": "good night" }
    ],
    "seekCharacters": ["月", "兔"],
    "imageRef": "images/group_3.png"
  }
]"#;

pub fn catalog() -> Result<Catalog, LoadError> {
    Catalog::from_json(DEMO_CATALOG_JSON)
}
